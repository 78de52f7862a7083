use colored::*;
use imagina::{
    ledger,
    logger::{self, LoggerConfig},
    AppState, Config, GeminiImageClient, ImageSize, ImaginaError, Orientation, View,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const PREVIEW_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Nav(View),
    Generate {
        orientation: Orientation,
        size: ImageSize,
        prompt: String,
    },
    Search(String),
    Page(usize),
    Next,
    Prev,
    Show(String),
    Regenerate(String),
    Download(String),
    Buy(String),
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "nav" | "go" => Ok(Command::Nav(View::parse_or_default(rest))),
            "generator" | "library" | "pricing" | "admin" => {
                Ok(Command::Nav(View::parse_or_default(name)))
            }
            "gen" | "generate" => parse_generate(rest),
            "search" => Ok(Command::Search(rest.to_string())),
            "page" => rest
                .parse()
                .map(Command::Page)
                .map_err(|_| format!("'{}' is not a page number", rest)),
            "next" => Ok(Command::Next),
            "prev" | "previous" => Ok(Command::Prev),
            "show" => required_arg(rest, "show <image-id>").map(Command::Show),
            "regen" | "regenerate" => {
                required_arg(rest, "regen <image-id>").map(Command::Regenerate)
            }
            "download" => required_arg(rest, "download <image-id>").map(Command::Download),
            "buy" => required_arg(rest, "buy <package-id>").map(Command::Buy),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("type 'help' for commands".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

fn required_arg(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

/// `gen [orientation] [size] <prompt>`; orientation and size may come in either order.
fn parse_generate(rest: &str) -> Result<Command, String> {
    let mut orientation = Orientation::default();
    let mut size = ImageSize::default();
    let mut words = rest.split_whitespace().peekable();

    while let Some(word) = words.peek() {
        if let Ok(parsed) = word.parse::<Orientation>() {
            orientation = parsed;
        } else if let Ok(parsed) = word.parse::<ImageSize>() {
            size = parsed;
        } else {
            break;
        }
        words.next();
    }

    let prompt = words.collect::<Vec<_>>().join(" ");
    if prompt.is_empty() {
        return Err("usage: gen [portrait|landscape|square] [hd|2k|4k] <prompt>".to_string());
    }
    Ok(Command::Generate {
        orientation,
        size,
        prompt,
    })
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}

fn render_header(state: &AppState) {
    println!();
    println!(
        "{} │ {} │ {} │ [{}]",
        "Imagina".bright_magenta().bold(),
        state.user().email,
        format!("{} credits", state.credits()).bright_yellow(),
        state.current_view().as_str().bright_cyan()
    );
    println!("{}", "─".repeat(60).bright_black());
}

fn render_generator(state: &AppState) {
    println!("{}", "Create your masterpiece".bold());
    for size in ImageSize::ALL {
        let cost = ledger::cost_of(size);
        let label = format!(
            "  {:<3} {} {}",
            size,
            cost,
            if cost > 1 { "Credits" } else { "Credit" }
        );
        if ledger::can_afford(state.credits(), size) {
            println!("{}", label);
        } else {
            println!("{}", label.bright_black());
        }
    }
    let orientations: Vec<&str> = Orientation::ALL.iter().map(|o| o.as_str()).collect();
    println!("  Orientations: {}", orientations.join(", "));

    if let Some(error) = state.lifecycle().error() {
        println!("{}", error.red());
    }

    match state.catalog().latest() {
        Some(image) => {
            println!();
            println!("Latest: {} ({}, {})", image.prompt.bold(), image.size, image.orientation);
            println!("  id:  {}", image.id);
            println!("  url: {}", preview(&image.image_url).bright_black());
        }
        None => {
            println!();
            println!("Your generated image will appear here. Let's create something amazing!");
        }
    }
}

fn render_library(state: &AppState) {
    println!("{}", "Your Library".bold());
    if !state.library().search_term().is_empty() {
        println!("Search: \"{}\"", state.library().search_term());
    }

    let page = state.library_page();
    if page.images.is_empty() {
        println!("No Images Found");
        if state.library().search_term().is_empty() {
            println!("Generate some images to see them here!");
        } else {
            println!("Try a different search term.");
        }
        return;
    }

    for image in &page.images {
        println!(
            "  {}  {}  ({}, {}, {})",
            image.id.bright_black(),
            preview(&image.prompt),
            image.size,
            image.orientation,
            image.created_at.format("%Y-%m-%d")
        );
    }
    if page.total_pages > 1 {
        println!("Page {} of {}", page.number, page.total_pages);
    }
}

fn render_pricing(state: &AppState) {
    println!("{}", "Choose Your Plan".bold());
    for package in state.packages() {
        let title = format!("{} ({})", package.name, package.id);
        let title = if package.is_popular {
            format!("{} {}", title.bold(), "Most Popular".bright_magenta())
        } else {
            title.bold().to_string()
        };
        println!("  {}", title);
        println!(
            "    {} credits for {} - {}",
            package.credits,
            package.display_price(),
            package.description
        );
    }
    println!("Use 'buy <package-id>' to top up.");
}

fn render(state: &AppState) {
    render_header(state);
    match state.current_view() {
        View::Generator => render_generator(state),
        View::Library => render_library(state),
        View::Pricing => render_pricing(state),
        View::Admin => println!("Admin dashboard is not available yet."),
    }
}

fn render_help() {
    println!("Commands:");
    println!("  nav <generator|library|pricing>      switch screens");
    println!("  gen [orientation] [hd|2k|4k] <text>  generate an image");
    println!("  search <text>                        filter the library by prompt");
    println!("  page <n> | next | prev               move through library pages");
    println!("  show <id>                            image details");
    println!("  regen <id>                           generate again with the same settings");
    println!("  download <id>                        save the image to disk");
    println!("  buy <starter|creator|pro>            purchase credits");
    println!("  quit");
}

fn render_details(state: &AppState, id: &str) {
    match state.catalog().get(id) {
        Some(image) => {
            println!("{}", "Details".bold());
            println!("  Prompt:      {}", image.prompt);
            println!("  Size:        {}", image.size);
            println!("  Orientation: {}", image.orientation);
            println!("  Created:     {}", image.created_at.format("%Y-%m-%d %H:%M"));
            println!("  Locator:     {}", preview(&image.image_url));
        }
        None => println!("{}", format!("No image with id {}", id).red()),
    }
}

async fn download(state: &AppState, id: &str) -> imagina::Result<String> {
    let image = state
        .catalog()
        .get(id)
        .ok_or_else(|| ImaginaError::UnknownImage(id.to_string()))?;
    let bytes = image.decode_data_url()?;
    let file_name = image.download_file_name();
    tokio::fs::write(&file_name, &bytes)
        .await
        .map_err(|e| ImaginaError::Internal(format!("could not write {}: {}", file_name, e)))?;
    log::info!("💾 Saved {} ({} bytes)", file_name, bytes.len());
    Ok(file_name)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();

    logger::init_with_config(LoggerConfig::from_app_config(&config))?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    logger::log_config_info(&config);

    let client = match GeminiImageClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to initialize image client: {}", e);
            log::error!("Set GEMINI_API_KEY (or API_KEY) in the environment or a .env file");
            return Err(e.into());
        }
    };

    let mut state = AppState::from_config(&config);
    render(&state);
    render_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.yellow());
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                render_help();
                continue;
            }
            Command::Nav(view) => {
                state.navigate(view);
            }
            Command::Generate {
                orientation,
                size,
                prompt,
            } => {
                state.navigate(View::Generator);
                println!("Conjuring your vision... This might take a moment.");
                // the outcome message is rendered from the lifecycle below
                if let Err(e) = state.generate(&client, &prompt, orientation, size).await {
                    log::debug!("Generation did not complete: {}", e);
                }
            }
            Command::Search(term) => {
                state.navigate(View::Library);
                state.search(term);
            }
            Command::Page(n) => {
                state.navigate(View::Library);
                if let Err(e) = state.go_to_page(n) {
                    println!("{}", e.to_string().yellow());
                }
            }
            Command::Next => {
                state.navigate(View::Library);
                state.next_page();
            }
            Command::Prev => {
                state.navigate(View::Library);
                state.previous_page();
            }
            Command::Show(id) => {
                render_details(&state, &id);
                continue;
            }
            Command::Regenerate(id) => {
                state.navigate(View::Generator);
                println!("Conjuring your vision... This might take a moment.");
                match state.regenerate(&client, &id).await {
                    Ok(_) => {}
                    Err(ImaginaError::UnknownImage(id)) => {
                        println!("{}", format!("No image with id {}", id).red())
                    }
                    Err(e) => log::debug!("Regeneration did not complete: {}", e),
                }
            }
            Command::Download(id) => {
                match download(&state, &id).await {
                    Ok(file_name) => println!("Saved {}", file_name.bright_green()),
                    Err(e) => println!("{}", e.to_string().red()),
                }
                continue;
            }
            Command::Buy(package_id) => match state.purchase(&package_id) {
                Ok(payment) => println!(
                    "{}",
                    format!(
                        "Thank you for your purchase! {} credits have been added.",
                        payment.credits_added
                    )
                    .bright_green()
                ),
                Err(e) => println!("{}", e.to_string().red()),
            },
        }

        render(&state);
    }

    log::info!("👋 Goodbye");
    Ok(())
}
