use clap::Parser;
use helpers_extractor::{build, handle_pipe_command, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Handle commands
    match cli.command {
        Commands::Build(args) => {
            // Run the build
            match build(args).await {
                Ok(result) => {
                    println!("Build successful!");
                    match &result.source_path {
                        Some(path) => println!("  - Source: {}", path.display()),
                        None => println!("  - No stylesheet found (empty artifacts)"),
                    }
                    println!("  - {} panel items", result.items.len());
                    println!("  - {} bytes of CSS", result.css_content.len());
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Pipe(args) => {
            // Handle pipe mode
            handle_pipe_command(args).await?;
            Ok(())
        }
    }
}
