//! IR dump folding language server.
//!
//! Collapses the intermediate-representation dumps that compilers print
//! between passes, while keeping diagnostics and crash traces visible.

use std::sync::OnceLock;

use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, info, warn};

mod document;
pub mod fold;
mod lsp;
pub mod report;
pub(crate) mod settings;

pub use document::{DocumentState, DocumentStore, LineIndex};
pub use lsp::folding_ranges;
pub use settings::{
    discover_settings, load_settings, parse_settings, FileSettings, GateSettings, Settings,
    SettingsError, SETTINGS_FILE,
};

use fold::DumpGate;

/// Command that drops the cached dump detection for one document URI.
pub const RELOAD_COMMAND: &str = "irfold.reload";

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    settings: OnceLock<Settings>,
    gate: OnceLock<DumpGate<Url>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            settings: OnceLock::new(),
            gate: OnceLock::new(),
        }
    }

    fn settings(&self) -> &Settings {
        self.settings.get_or_init(Settings::default)
    }

    fn gate(&self) -> &DumpGate<Url> {
        self.gate
            .get_or_init(|| DumpGate::new(self.settings().gate.scan_limit))
    }

    /// Whether the client's document is a dump log we fold.
    fn recognizes(&self, uri: &Url, language_id: &str) -> bool {
        self.settings().files.recognizes(uri.path(), language_id)
    }

    /// Forget the dump detection for a document that was reloaded.
    fn reload(&self, uri: &Url) {
        self.gate().invalidate(uri);
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let settings = match workspace_root {
            Some(root) => {
                // Discover settings by walking up the directory tree
                let (settings, settings_dir) = settings::discover_settings(&root);
                debug!(dir = %settings_dir.display(), "resolved settings");
                settings
            }
            None => Settings::default(),
        };
        if self.settings.set(settings).is_err() {
            warn!("settings were used before initialize; keeping defaults");
        }
        let scan_limit = self.settings().gate.scan_limit;
        if self.gate.set(DumpGate::new(scan_limit)).is_err() {
            warn!(
                scan_limit,
                active = self.gate().scan_limit(),
                "dump gate already in use; ignoring configured scan limit"
            );
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![RELOAD_COMMAND.to_string()],
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "IR dump folding server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        if !self.recognizes(&doc.uri, &doc.language_id) {
            debug!(uri = %doc.uri, language_id = %doc.language_id, "not a dump log");
            return;
        }

        // Opening is a (re)load: whatever was cached for this URI is stale.
        self.reload(&doc.uri);
        let state = self
            .documents
            .open(doc.uri.clone(), doc.text, doc.version);
        info!(
            uri = %doc.uri,
            lines = state.line_index.len(),
            version = state.version,
            "opened dump log"
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            // Edits keep the cached dump detection.
            self.documents.update(
                &params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.documents.close(&uri).is_some() {
            self.reload(&uri);
            debug!(%uri, "closed dump log");
        }
    }

    async fn folding_range(
        &self,
        params: FoldingRangeParams,
    ) -> Result<Option<Vec<FoldingRange>>> {
        let uri = &params.text_document.uri;

        let Some(doc) = self.documents.get(uri) else {
            return Ok(None);
        };

        Ok(Some(lsp::folding_ranges(self.gate(), uri, &doc.line_index)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != RELOAD_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        let uri = params
            .arguments
            .into_iter()
            .next()
            .and_then(|arg| serde_json::from_value::<Url>(arg).ok())
            .ok_or_else(|| {
                Error::invalid_params(format!("{RELOAD_COMMAND} expects a document URI"))
            })?;

        self.reload(&uri);
        info!(%uri, "reloaded dump detection");
        Ok(None)
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
