use clap::Parser;
use oss_adapter::config::cli::sign_options;
use oss_adapter::config::toml_config::TomlConfig;
use oss_adapter::utils::error::{ErrorSeverity, Result};
use oss_adapter::utils::logger;
use oss_adapter::{parse_path, Cli, Command, ObjectStorage, OssStorage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 載入 TOML 配置 (若有指定)
    let file_config = match cli.file_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = cli.verbose || file_config.as_ref().is_some_and(TomlConfig::verbose);
    if cli.json_logs || file_config.as_ref().is_some_and(TomlConfig::json_logs) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(&cli, file_config).await {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            command_name(&cli.command),
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &Cli, file_config: Option<TomlConfig>) -> Result<()> {
    if let Command::ParsePath { url } = &cli.command {
        println!("{}", parse_path(url)?);
        return Ok(());
    }

    let config = cli.storage_config(file_config)?;
    tracing::debug!("storage config: {:?}", config);

    let storage: Arc<dyn ObjectStorage> = Arc::new(OssStorage::new(&config)?);
    tracing::info!("🔌 Using bucket '{}'", config.bucket_name);

    execute(storage.as_ref(), &cli.command).await
}

async fn execute(storage: &dyn ObjectStorage, command: &Command) -> Result<()> {
    match command {
        Command::UploadUrl { key, url } => {
            storage.upload_from_url(key, url).await?;
            tracing::info!("✅ Uploaded {} to {}", url, key);
        }
        Command::UploadFile { key, file } => {
            let data = tokio::fs::read(file).await?;
            storage.upload_from_bytes(key, &data).await?;
            tracing::info!("✅ Uploaded {} ({} bytes) to {}", file.display(), data.len(), key);
        }
        Command::ParsePath { url } => {
            println!("{}", storage.parse_path(url)?);
        }
        Command::Sign {
            key,
            expires,
            options,
            json,
        } => {
            let signed = storage
                .generate_signed_url(key, *expires, &sign_options(options))
                .await?;

            if *json {
                let expires_at = chrono::Utc::now() + chrono::Duration::seconds(*expires);
                let output = serde_json::json!({
                    "key": key,
                    "url": signed,
                    "expires_at": expires_at.to_rfc3339(),
                });
                println!("{}", output);
            } else {
                println!("{}", signed);
            }
        }
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::UploadUrl { .. } => "upload-url",
        Command::UploadFile { .. } => "upload-file",
        Command::ParsePath { .. } => "parse-path",
        Command::Sign { .. } => "sign",
    }
}
