use clap::{Parser, Subcommand};
use tracing::info;
use wikilang::{Config, LanguageCode};

const DEMO_TITLE: &str = "The Moon and the Bonfires";

/// Find a book's Wikipedia article in the language it was written in.
#[derive(Parser, Debug)]
#[command(name = "wikilang", version, about)]
struct Cli {
    /// User agent sent to Wikimedia (overrides WIKILANG_USER_AGENT / USER_AGENT).
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the original language code of a work.
    Lang { title: String },

    /// Print the title of the work's article in another edition.
    Title {
        title: String,
        /// Target edition (defaults to the work's original language).
        #[arg(long)]
        lang: Option<String>,
    },

    /// Print the article text, or one section of it.
    Text {
        title: String,
        /// Exact section heading to extract.
        #[arg(long)]
        section: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wikilang=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(user_agent) = cli.user_agent {
        config = config.with_user_agent(user_agent);
    }

    let resolver = wikilang::connect(&config)?;

    match cli.command {
        Some(Command::Lang { title }) => {
            println!("{}", resolver.resolve_original_language(&title).await);
        }
        Some(Command::Title { title, lang }) => {
            let lang = match lang {
                Some(raw) => LanguageCode::parse(&raw)
                    .ok_or_else(|| format!("invalid language code: '{raw}'"))?,
                None => resolver.resolve_original_language(&title).await,
            };
            println!("{}", resolver.localize_title(&title, &lang).await);
        }
        Some(Command::Text { title, section }) => {
            println!("{}", resolver.fetch_text(&title, section.as_deref()).await);
        }
        None => {
            info!(title = DEMO_TITLE, "no command given, running demo lookup");
            let resolution = resolver.resolve(DEMO_TITLE).await;
            println!("Original language: {}", resolution.language);
            println!("{}", resolution.title);
        }
    }

    Ok(())
}
