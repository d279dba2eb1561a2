use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

use tubequiz_core::{
    ChatCompletionsModel, Provider, QuizContract, QuizPresenter, QuizSession, RawQuiz,
    TubequizError, YtDlpTranscripts, fetch_transcript, format_grade_report,
    format_quiz_readable, format_transcript_with_timestamps, install_raw_quiz, quiz_text,
    quiz_video, strip_timestamps, summarize, summarize_video,
};

use crate::presenter::ConsolePresenter;

mod presenter;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliContract {
    FreeText,
    #[default]
    Structured,
}

impl From<CliContract> for QuizContract {
    fn from(cli: CliContract) -> Self {
        match cli {
            CliContract::FreeText => QuizContract::FreeText,
            CliContract::Structured => QuizContract::Structured,
        }
    }
}

#[derive(Parser)]
#[command(name = "tubequiz")]
#[command(about = "Summarize YouTube videos and quiz yourself on them with AI-generated questions")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// AI provider for summaries and quizzes
    #[arg(short, long, global = true, default_value = "gemini")]
    provider: CliProvider,

    /// Model name to request instead of the provider default (also TUBEQUIZ_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Seconds to wait for the model before giving up
    #[arg(long, global = true, default_value_t = 120)]
    timeout: u64,

    /// Subtitle language, repeat to add fallbacks (tried in order)
    #[arg(short, long = "lang", global = true, default_values = ["en", "en-US"])]
    langs: Vec<String>,

    /// Print the raw model response, also when it cannot be parsed
    #[arg(long, global = true)]
    show_raw: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the video transcript
    Transcript {
        /// Video URL
        url: String,

        /// Prefix each caption line with its time range
        #[arg(long)]
        timestamps: bool,
    },
    /// Summarize the video in bullet points
    Summary {
        /// Video URL
        #[arg(required_unless_present = "transcript_file")]
        url: Option<String>,

        /// Use a saved transcript (plain or `--timestamps` output) instead of fetching
        #[arg(long, conflicts_with = "url")]
        transcript_file: Option<PathBuf>,
    },
    /// Generate a 10 question quiz and take it in the terminal
    Quiz {
        /// Video URL
        #[arg(required_unless_present_any = ["raw_file", "transcript_file"])]
        url: Option<String>,

        /// Output format the model is asked to follow
        #[arg(short, long, default_value = "structured")]
        contract: CliContract,

        /// Parse a saved model response instead of calling the model
        #[arg(long, conflicts_with_all = ["url", "transcript_file"])]
        raw_file: Option<PathBuf>,

        /// Use a saved transcript (plain or `--timestamps` output) instead of fetching
        #[arg(long, conflicts_with = "url")]
        transcript_file: Option<PathBuf>,

        /// Print the questions as markdown and exit without taking the quiz
        #[arg(long)]
        print: bool,
    },
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read a transcript saved by `tubequiz transcript`, dropping any time markers.
async fn read_transcript_file(path: &PathBuf) -> Result<String> {
    let text = strip_timestamps(&fs::read_to_string(path).await?);
    if text.trim().is_empty() {
        anyhow::bail!("{} contains no transcript text", path.display());
    }
    Ok(text)
}

fn model_for(cli: &Cli) -> Result<(Provider, ChatCompletionsModel)> {
    let provider: Provider = cli.provider.into();
    let mut model = ChatCompletionsModel::from_env(provider, Duration::from_secs(cli.timeout))?;
    if let Some(name) = &cli.model {
        model = model.with_model(name.clone());
    }
    Ok((provider, model))
}

fn done(msg: &str) -> String {
    format!("{} {}", style("✓").green().bold(), msg)
}

async fn run_transcript(cli: &Cli, url: &str, timestamps: bool) -> Result<()> {
    let service = YtDlpTranscripts::new(cli.langs.clone());
    let spinner = create_spinner("Fetching transcript...")?;
    let transcript = fetch_transcript(&service, url).await;
    spinner.finish_and_clear();
    let transcript = transcript?;

    println!(
        "{}\n",
        done(&format!(
            "Transcript: {:.1} min, {}",
            transcript.duration_seconds() / 60.0,
            style(&transcript.language).yellow()
        ))
    );
    if timestamps {
        println!("{}", format_transcript_with_timestamps(&transcript));
    } else {
        println!("{}", transcript.plain_text());
    }
    Ok(())
}

async fn run_summary(cli: &Cli, url: Option<&str>, transcript_file: Option<&PathBuf>) -> Result<()> {
    let saved = match transcript_file {
        Some(path) => Some(read_transcript_file(path).await?),
        None => None,
    };
    let (provider, model) = model_for(cli)?;
    let service = YtDlpTranscripts::new(cli.langs.clone());

    let spinner = create_spinner(&format!("Generating summary with {}...", provider.name()))?;
    let summary = match (saved, url) {
        (Some(text), _) => summarize(&model, &text).await,
        (None, Some(url)) => summarize_video(&service, &model, url).await,
        (None, None) => {
            spinner.finish_and_clear();
            anyhow::bail!("a video URL or --transcript-file is required")
        }
    };
    spinner.finish_and_clear();
    let summary = summary?;

    println!("{}\n", done(&format!("Summary generated ({}, {})", provider.name(), model.model())));
    println!("{}", style("## Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", summary);
    Ok(())
}

struct QuizArgs<'a> {
    url: Option<&'a str>,
    contract: QuizContract,
    raw_file: Option<&'a PathBuf>,
    transcript_file: Option<&'a PathBuf>,
    print: bool,
}

async fn run_quiz(cli: &Cli, args: QuizArgs<'_>) -> Result<()> {
    let QuizArgs {
        url,
        contract,
        raw_file,
        transcript_file,
        print,
    } = args;
    let mut session = QuizSession::new();

    if let Some(path) = raw_file {
        let response = fs::read_to_string(path).await?;
        install_raw_quiz(&mut session, RawQuiz::new(contract, &response))?;
        println!("{}", done(&format!("Quiz loaded from {}", path.display())));
    } else {
        let saved = match transcript_file {
            Some(path) => Some(read_transcript_file(path).await?),
            None => None,
        };
        let (provider, model) = model_for(cli)?;
        let service = YtDlpTranscripts::new(cli.langs.clone());

        let spinner = create_spinner(&format!(
            "Generating {} quiz with {}...",
            contract,
            provider.name()
        ))?;
        let generated = match (saved, url) {
            (Some(text), _) => quiz_text(&model, &text, contract, &mut session).await,
            (None, Some(url)) => quiz_video(&service, &model, url, contract, &mut session).await,
            (None, None) => {
                spinner.finish_and_clear();
                anyhow::bail!("a video URL, --transcript-file or --raw-file is required")
            }
        }
        .map(|_| ());
        spinner.finish_and_clear();
        generated?;
        println!("{}", done(&format!("Quiz generated ({}, {})", provider.name(), model.model())));
    }

    if let (true, Some(raw)) = (cli.show_raw, session.raw()) {
        println!("{}\n{}\n", style("Raw model response:").dim(), raw.payload);
    }
    let quiz = session.quiz().ok_or(TubequizError::NoActiveQuiz)?;
    for issue in quiz.issues() {
        println!("{} {}", style("!").yellow().bold(), issue);
    }

    if print {
        println!("\n{}", format_quiz_readable(quiz));
        return Ok(());
    }

    let mut presenter = ConsolePresenter::new();
    let Some(answers) = presenter.present(quiz)? else {
        println!("{}", style("Quiz not submitted.").dim());
        return Ok(());
    };

    let result = session.grade(&answers)?;
    println!("{}", style("─".repeat(60)).dim());
    let report = format_grade_report(result);
    let mut lines = report.lines();
    let headline = style(lines.next().unwrap_or_default()).bold();
    if result.is_perfect() {
        println!("{}", headline.green());
    } else {
        println!("{}", headline.yellow());
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Transcript { url, timestamps } => run_transcript(cli, url, *timestamps).await,
        Command::Summary {
            url,
            transcript_file,
        } => run_summary(cli, url.as_deref(), transcript_file.as_ref()).await,
        Command::Quiz {
            url,
            contract,
            raw_file,
            transcript_file,
            print,
        } => {
            let args = QuizArgs {
                url: url.as_deref(),
                contract: (*contract).into(),
                raw_file: raw_file.as_ref(),
                transcript_file: transcript_file.as_ref(),
                print: *print,
            };
            run_quiz(cli, args).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    println!(
        "\n{}  {}\n",
        style("tubequiz").cyan().bold(),
        style("YouTube Summaries & Quizzes").dim()
    );

    if let Err(e) = run(&cli).await {
        let Some(err) = e.downcast_ref::<TubequizError>() else {
            return Err(e);
        };
        eprintln!("{} {}", style("Error:").red().bold(), err.user_message());
        tracing::debug!(error = %err, "command failed");
        if let (true, Some(raw)) = (cli.show_raw, err.raw_payload()) {
            eprintln!("\n{}\n{}", style("Raw model response:").dim(), raw);
        }
        std::process::exit(1);
    }

    Ok(())
}
