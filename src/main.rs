use std::sync::Arc;

use inbox_triage::classifier::IntentClassifier;
use inbox_triage::config::AgentConfig;
use inbox_triage::dispatch::ActionDispatcher;
use inbox_triage::filter::SenderFilter;
use inbox_triage::gateways::{ReplyGateway, SchedulingGateway};
use inbox_triage::ingress::ingress_routes;
use inbox_triage::pipeline::TriagePipeline;
use inbox_triage::poller::spawn_inbox_poller;
use inbox_triage::providers::{
    GeminiClient, GmailClient, GoogleCalendarClient, GoogleToken, Mailbox,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AgentConfig::from_env()?;

    eprintln!("📬 Inbox Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Ingress: http://{}/email", config.bind_addr);
    eprintln!("   Poll interval: {}s", config.poll_interval_secs);
    eprintln!("   Meeting zone: {}", config.meeting_timezone.name());
    eprintln!("   Model: {}\n", config.gemini_model);

    // Credential artifact from the one-time auth bootstrap
    let token = GoogleToken::load(&config.token_path)?;

    // Collaborators
    let http = reqwest::Client::new();
    let mailbox: Arc<dyn Mailbox> = Arc::new(GmailClient::new(http.clone(), token.clone()));
    let calendar = Arc::new(GoogleCalendarClient::new(http.clone(), token));
    let llm = Arc::new(GeminiClient::new(
        http,
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    // Pipeline: Filter → Classifier → Dispatcher
    let filter = SenderFilter::new(config.whitelist_path.clone());
    let classifier = IntentClassifier::new(llm);
    let dispatcher = ActionDispatcher::new(
        SchedulingGateway::new(calendar, config.meeting_timezone),
        ReplyGateway::new(Arc::clone(&mailbox)),
    );
    let pipeline = Arc::new(TriagePipeline::new(filter, classifier, dispatcher));

    // Background poll loop, separate from the ingress server
    let (_poller_handle, _shutdown) = spawn_inbox_poller(
        mailbox,
        Arc::clone(&pipeline),
        config.poll_interval_secs,
    );

    // Ingress endpoint
    let app = ingress_routes(pipeline);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Ingress endpoint started");
    axum::serve(listener, app).await?;

    Ok(())
}
