use campus_market::app::shell::{stdin_lines, App};
use campus_market::app::views::HOME;
use campus_market::config::{Command, LogFormat};
use campus_market::utils::error::{ErrorSeverity, MarketError};
use campus_market::utils::prompt::StdinPrompter;
use campus_market::utils::{logger, validation::Validate};
use campus_market::{CliConfig, HttpMarketplaceApi};
use clap::Parser;

fn exit_code(e: &MarketError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &MarketError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let api = match HttpMarketplaceApi::new(&config) {
        Ok(api) => api,
        Err(e) => fail(&e),
    };
    tracing::info!("Using marketplace at {}", api.base_url());

    let mut app = App::new(Box::new(api), Box::new(StdinPrompter), config);

    if let Some(username) = cli.user.as_deref() {
        let rendered = app.sign_in_as(username).await;
        if let Some(e) = &rendered.error {
            eprintln!("{}", rendered.text);
            fail(e);
        }
        tracing::info!("{}", rendered.text);
    }

    let command = match cli.command {
        None => {
            println!("{}", HOME);
            return;
        }
        Some(Command::Shell) => {
            app.start().await;
            if let Err(e) = app.run_shell(stdin_lines(), &mut std::io::stdout()).await {
                fail(&e);
            }
            return;
        }
        Some(command) => command,
    };

    let rendered = app.execute(command).await;
    println!("{}", rendered.text);

    if let Some(e) = &rendered.error {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        let code = exit_code(e);
        if code > 0 {
            std::process::exit(code);
        }
    }
}
