use clap::Parser;
use helix_swarm::utils::{logger, validation::Validate};
use helix_swarm::{CliConfig, SwarmClient, SwarmError};

/// Exit codes: 1 request rejected, 2 server unreachable, 3 local usage error.
fn exit_code(error: &SwarmError) -> i32 {
    match error {
        SwarmError::Request { .. } | SwarmError::Decode(_) => 1,
        SwarmError::Connection(_) => 2,
        _ => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let (config, file) = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    logger::init_cli_logger(
        cli.verbose,
        file.as_ref().and_then(|f| f.log_filter()),
        file.as_ref().map(|f| f.json_logs()).unwrap_or(false),
    );
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(exit_code(&e));
    }

    let swarm = SwarmClient::from_config(&config)?;
    let outcome = cli.run(&swarm).await;
    swarm.close();

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Swarm call failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}
