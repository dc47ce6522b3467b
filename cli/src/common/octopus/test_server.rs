//! Fake Octopus server for tests: serves an axum `Router` on an ephemeral
//! localhost port and returns its base URL.
use axum::Router;

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Octopus server");
    let addr = listener
        .local_addr()
        .expect("Fake Octopus server has no local address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake Octopus server stopped unexpectedly");
    });
    format!("http://{}", addr)
}
