//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use cms2_analysis::completion::{completion_items, CompletionCandidate};
use cms2_analysis::hover::hover_at;
use cms2_analysis::navigation::{definition_line, find_references};
use cms2_analysis::symbols::{document_symbols as collect_document_symbols, DocumentSymbolInfo};
use cms2_analysis::words::word_at_position;
use cms2_parser::cms2::range::{Position as SrcPosition, Range as SrcRange};
use cms2_parser::cms2::{parse_source, SemanticModel};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, CompletionResponse, Documentation,
    DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverContents, HoverParams, HoverProviderCapability,
    InitializeParams, InitializeResult, InitializedParams, Location, MarkupContent, MarkupKind,
    OneOf, Position, Range, ReferenceParams, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url,
};
use tower_lsp::Client;

pub trait LspClient: Send + Sync + Clone + 'static {}
impl LspClient for Client {}

pub trait FeatureProvider: Send + Sync + 'static {
    fn completions(
        &self,
        model: &SemanticModel,
        line_text: &str,
        character: usize,
    ) -> Vec<CompletionCandidate>;
    fn hover(&self, model: &SemanticModel, text: &str, position: SrcPosition) -> Option<String>;
    fn definition(&self, model: &SemanticModel, text: &str, position: SrcPosition)
        -> Option<usize>;
    fn references(&self, text: &str, position: SrcPosition) -> Vec<SrcRange>;
    fn document_symbols(&self, model: &SemanticModel) -> Vec<DocumentSymbolInfo>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn completions(
        &self,
        model: &SemanticModel,
        line_text: &str,
        character: usize,
    ) -> Vec<CompletionCandidate> {
        completion_items(model, line_text, character)
    }

    fn hover(&self, model: &SemanticModel, text: &str, position: SrcPosition) -> Option<String> {
        hover_at(model, text, position.line, position.column)
    }

    fn definition(
        &self,
        model: &SemanticModel,
        text: &str,
        position: SrcPosition,
    ) -> Option<usize> {
        let word = word_at_position(text, position.line, position.column)?;
        definition_line(model, &word.text)
    }

    fn references(&self, text: &str, position: SrcPosition) -> Vec<SrcRange> {
        match word_at_position(text, position.line, position.column) {
            Some(word) => find_references(text, &word.text),
            None => Vec::new(),
        }
    }

    fn document_symbols(&self, model: &SemanticModel) -> Vec<DocumentSymbolInfo> {
        collect_document_symbols(model)
    }
}

#[derive(Clone)]
struct DocumentEntry {
    model: Arc<SemanticModel>,
    text: Arc<String>,
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, DocumentEntry>>,
}

impl DocumentStore {
    // Parsing is best-effort and infallible, so every open document has a model.
    async fn upsert(&self, uri: Url, text: String) -> DocumentEntry {
        let entry = DocumentEntry {
            model: Arc::new(parse_source(&text)),
            text: Arc::new(text),
        };
        self.entries.write().await.insert(uri, entry.clone());
        entry
    }

    async fn get(&self, uri: &Url) -> Option<DocumentEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

pub struct Cms2LanguageServer<C = Client, P = DefaultFeatureProvider> {
    _client: C,
    documents: DocumentStore,
    features: Arc<P>,
}

impl Cms2LanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()))
    }
}

impl<C, P> Cms2LanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            _client: client,
            documents: DocumentStore::default(),
            features,
        }
    }

    async fn parse_and_store(&self, uri: Url, text: String) {
        self.documents.upsert(uri, text).await;
    }

    async fn document_entry(&self, uri: &Url) -> Option<DocumentEntry> {
        self.documents.get(uri).await
    }
}

fn to_lsp_position(position: &SrcPosition) -> Position {
    Position::new(position.line as u32, position.column as u32)
}

fn to_lsp_range(range: &SrcRange) -> Range {
    Range {
        start: to_lsp_position(&range.start),
        end: to_lsp_position(&range.end),
    }
}

fn from_lsp_position(position: Position) -> SrcPosition {
    SrcPosition {
        line: position.line as usize,
        column: position.character as usize,
    }
}

fn to_completion_item(candidate: &CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(candidate.kind),
        detail: candidate.detail.clone(),
        documentation: candidate
            .documentation
            .clone()
            .map(Documentation::String),
        ..CompletionItem::default()
    }
}

#[allow(deprecated)]
fn to_document_symbol(symbol: &DocumentSymbolInfo) -> DocumentSymbol {
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range: symbol.range,
        selection_range: symbol.selection_range,
        children: None,
        tags: None,
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for Cms2LanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(vec![".".into(), "(".into(), " ".into()]),
                ..CompletionOptions::default()
            }),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            definition_provider: Some(OneOf::Left(true)),
            references_provider: Some(OneOf::Left(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "CMS-2 Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {}

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem { uri, text, .. } = params.text_document;
        self.parse_and_store(uri, text).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.parse_and_store(params.text_document.uri, change.text)
                .await;
        }
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        if let Some(entry) = self
            .document_entry(&params.text_document_position.text_document.uri)
            .await
        {
            let line_text = entry
                .text
                .lines()
                .nth(position.line as usize)
                .unwrap_or("");
            let candidates =
                self.features
                    .completions(&entry.model, line_text, position.character as usize);
            let items: Vec<CompletionItem> = candidates.iter().map(to_completion_item).collect();
            Ok(Some(CompletionResponse::Array(items)))
        } else {
            Ok(None)
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        if let Some(entry) = self
            .document_entry(&params.text_document_position_params.text_document.uri)
            .await
        {
            let position = from_lsp_position(params.text_document_position_params.position);
            if let Some(markdown) = self.features.hover(&entry.model, &entry.text, position) {
                return Ok(Some(Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: markdown,
                    }),
                    range: None,
                }));
            }
        }
        Ok(None)
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params
            .text_document_position_params
            .text_document
            .uri
            .clone();
        if let Some(entry) = self.document_entry(&uri).await {
            let position = from_lsp_position(params.text_document_position_params.position);
            if let Some(line) = self.features.definition(&entry.model, &entry.text, position) {
                let start = Position::new(line as u32, 0);
                return Ok(Some(GotoDefinitionResponse::Scalar(Location {
                    uri,
                    range: Range::new(start, start),
                })));
            }
        }
        Ok(None)
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri.clone();
        if let Some(entry) = self.document_entry(&uri).await {
            let position = from_lsp_position(params.text_document_position.position);
            let locations: Vec<Location> = self
                .features
                .references(&entry.text, position)
                .iter()
                .map(|range| Location {
                    uri: uri.clone(),
                    range: to_lsp_range(range),
                })
                .collect();
            Ok(Some(locations))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let symbols = self.features.document_symbols(&entry.model);
            let converted: Vec<DocumentSymbol> = symbols.iter().map(to_document_symbol).collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }
}
