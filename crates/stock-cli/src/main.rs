//! 재고 관리 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 로그인 (비밀번호를 생략하면 stdin에서 읽음)
//! stock login -i alice@example.com
//!
//! # 현재 세션 확인
//! stock whoami
//!
//! # 화면 이동 가드 확인
//! stock open /admin-dashboard
//!
//! # 출고 이력 2페이지
//! stock history --type OUT --page 2
//!
//! # 사용자 시드용 해시 생성
//! echo 'password123' | stock hash-password
//! ```

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use stock_core::TransactionType;
use tracing_subscriber::EnvFilter;

use stock_cli::commands::{auth, hash, history, navigate};
use stock_cli::{ApiClient, HistoryFilter, SessionStore, DEFAULT_API_URL, DEFAULT_SESSION_FILE};

#[derive(Parser)]
#[command(name = "stock")]
#[command(about = "Stock inventory CLI - 로그인, 화면 가드, 재고 이력 조회", long_about = None)]
#[command(version)]
struct Cli {
    /// API 서버 주소
    #[arg(long, global = true, env = "STOCK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// 세션 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_SESSION_FILE)]
    session_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 로그인 후 세션 저장
    Login {
        /// 로그인 식별자 (이메일 또는 사용자명)
        #[arg(short, long)]
        identifier: String,

        /// 비밀번호 (생략하면 stdin 첫 줄)
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// 세션 삭제
    Logout,

    /// 현재 세션 정보
    Whoami,

    /// 화면 이동 (역할 가드 적용)
    Open {
        /// 화면 경로 (예: /admin-dashboard)
        path: String,
    },

    /// 재고 입출고 이력 조회
    History {
        /// 입출고 구분 (IN, OUT)
        #[arg(short, long = "type")]
        transaction_type: Option<String>,

        /// 페이지 번호
        #[arg(short, long)]
        page: Option<u32>,

        /// 페이지 크기 (최대 100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// 비밀번호 Argon2id 해시 출력
    HashPassword {
        /// 비밀번호 (생략하면 stdin 첫 줄)
        #[arg(short, long)]
        secret: Option<String>,
    },
}

/// 인자로 받지 못한 비밀번호를 stdin에서 읽음.
fn read_secret(arg: Option<String>) -> Result<SecretString> {
    if let Some(secret) = arg {
        return Ok(SecretString::from(secret));
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("stdin에서 비밀번호를 읽지 못했습니다")?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // 명령 출력과 섞이지 않도록 로그는 stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SessionStore::new(&cli.session_file);

    let output = match cli.command {
        Commands::Login { identifier, secret } => {
            let secret = read_secret(secret)?;
            let client = ApiClient::new(&cli.api_url)?;
            auth::login(&client, &store, &identifier, &secret).await?
        }

        Commands::Logout => auth::logout(&store)?,

        Commands::Whoami => auth::whoami(&store)?,

        Commands::Open { path } => navigate::open(&store, &path)?,

        Commands::History {
            transaction_type,
            page,
            limit,
        } => {
            let transaction_type = transaction_type
                .as_deref()
                .map(str::parse::<TransactionType>)
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?;

            let filter = HistoryFilter {
                transaction_type,
                page,
                limit,
            };
            let client = ApiClient::new(&cli.api_url)?;
            history::history(&client, &store, &filter).await?
        }

        Commands::HashPassword { secret } => {
            use secrecy::ExposeSecret;
            let secret = read_secret(secret)?;
            hash::hash(secret.expose_secret())?
        }
    };

    println!("{}", output);
    Ok(())
}
