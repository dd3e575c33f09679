use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use guess_ai::app::App;
use guess_ai::game::GuessRound;
use guess_ai::semantic::SimilarityScore;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "guess-ai")]
#[command(about = "Chat, generate images, and play \"guess the prompt\" with OpenAI models")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat; an empty line or EOF ends the session.
    Chat {
        /// Optional system instruction for the assistant.
        #[arg(long)]
        system: Option<String>,
    },
    /// Generate one image and print its URL (or data URL).
    Image {
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
    /// Play one round: generate an image from a secret prompt, then guess it.
    Play {
        /// Secret prompt; read from stdin when omitted.
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Score how close GUESS is to REFERENCE.
    Score {
        #[arg(value_name = "REFERENCE")]
        reference: String,
        #[arg(value_name = "GUESS")]
        guess: String,
    },
}

type StdinLines = Lines<BufReader<Stdin>>;

fn ask(question: &str) -> Result<()> {
    print!("{}", question);
    std::io::stdout().flush().context("failed to flush stdout")
}

const BAR_WIDTH: usize = 20;

async fn read_line<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<Option<String>> {
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

/// Ask for the secret prompt until a non-blank line arrives.
async fn read_secret_prompt<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<String> {
    loop {
        ask("Secret prompt: ")?;
        let Some(prompt) = read_line(lines).await? else {
            anyhow::bail!("No secret prompt entered");
        };
        if !prompt.is_empty() {
            return Ok(prompt);
        }
    }
}

fn similarity_bar(score: SimilarityScore) -> String {
    let filled = (score.display_percent() as usize * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        score.display_percent()
    )
}

async fn run_chat(app: &App, system: Option<String>, lines: &mut StdinLines) -> Result<()> {
    let mut session = app.chat_session();
    if let Some(system) = system {
        session = session.with_system_prompt(system);
    }

    loop {
        ask("you> ")?;
        let Some(input) = read_line(lines).await? else {
            break;
        };
        if input.is_empty() {
            break;
        }

        match session.send(&input).await {
            Ok(reply) => println!("assistant> {}", reply),
            Err(e) => {
                error!("Chat request failed: {}", e);
                println!("Failed to get a reply. Please try again.");
            }
        }
    }
    Ok(())
}

async fn run_play(app: &App, prompt: Option<String>, lines: &mut StdinLines) -> Result<()> {
    let prompt = match prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => read_secret_prompt(lines).await?,
    };

    let game = app.guess_game();
    let mut round = game
        .start_round(&prompt)
        .await
        .context("Failed to generate image. Please try again.")?;
    println!("Image: {}", round.image().display_source());

    loop {
        ask(&format!(
            "[{}s] Can you guess the prompt? ",
            round.seconds_remaining(Utc::now())
        ))?;
        let Some(guess) = read_line(lines).await? else {
            anyhow::bail!("No guess entered");
        };
        if guess.is_empty() {
            continue;
        }

        match game.submit_guess(&mut round, &guess).await {
            Ok(_) => break,
            Err(e) => {
                error!("Failed to process guess: {}", e);
                println!("Failed to process guess. Please try again.");
            }
        }
    }

    print_results(&round);
    Ok(())
}

fn print_results(round: &GuessRound) {
    println!("Original prompt: {}", round.prompt());
    println!("You guessed:     {}", round.guess().unwrap_or_default());
    if let Some(score) = round.score() {
        println!("Score:           {}", score);
        println!("Similarity:      {}", similarity_bar(score));
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let app = App::from_env().context("Failed to initialize application")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match args.command {
        Command::Chat { system } => run_chat(&app, system, &mut lines).await,
        Command::Image { prompt } => {
            let image = app
                .generate_image(&prompt)
                .await
                .context("Failed to generate image")?;
            println!("{}", image.display_source());
            Ok(())
        }
        Command::Play { prompt } => run_play(&app, prompt, &mut lines).await,
        Command::Score { reference, guess } => {
            let score = app
                .evaluator()
                .evaluate_guess(&reference, &guess)
                .await
                .context("Failed to process guess")?;
            println!("{}", score);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guess_ai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting guess-ai");

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
