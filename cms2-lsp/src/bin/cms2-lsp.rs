use cms2_lsp::Cms2LanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) = LspService::new(Cms2LanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
