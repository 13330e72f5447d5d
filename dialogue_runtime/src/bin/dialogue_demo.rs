use clap::{Parser, Subcommand};
use dialogue_graph::{FocusTarget, Graph, GraphId};
use dialogue_runtime::{
    ActorRef, BlackboardError, DialogueHost, FnListener, PropertyScope, Presentation, Runtime, RuntimeConfig,
    SessionError, SessionState,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dialogue-demo")]
#[command(about = "Play or check dialogue graphs in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Runtime config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a dialogue, reading option numbers from stdin
    Play {
        /// Graph to play
        graph: PathBuf,

        /// Extra graphs registered for shared properties
        #[arg(long = "with")]
        extra: Vec<PathBuf>,

        /// Actor display name
        #[arg(long, default_value = "Stranger")]
        actor: String,
    },

    /// Load a graph and report structural problems
    Check {
        /// Graph to check
        graph: PathBuf,
    },
}

/// Prints presentations and focus changes to stdout.
#[derive(Default)]
struct TerminalHost;

impl DialogueHost for TerminalHost {
    fn present(&mut self, presentation: &Presentation) {
        match &presentation.actor_name {
            Some(name) => println!("\n{name}: {}", presentation.text),
            None => println!("\n{}", presentation.text),
        }
        for option in &presentation.options {
            println!("  [{}] {}", option.port, option.label);
        }
    }

    fn focus(&mut self, target: FocusTarget, actor: Option<&ActorRef>) {
        match (target, actor) {
            (FocusTarget::Actor, Some(actor)) => println!("(looking at {})", actor.name()),
            _ => println!("(looking at you)"),
        }
    }

    fn on_error(&mut self, error: &SessionError) {
        eprintln!("dialogue aborted: {error}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialogue_runtime=info,dialogue_graph=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    match cli.command {
        Commands::Check { graph } => check(graph),
        Commands::Play {
            graph,
            extra,
            actor,
        } => play(config, graph, extra, actor),
    }
}

fn check(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let graph = Graph::load(&path)?;
    println!(
        "{}: {} nodes, {} links, {} properties",
        path.display(),
        graph.node_count(),
        graph.links().len(),
        graph.properties().len()
    );
    graph.validate()?;
    println!("ok");
    Ok(())
}

/// Property updates for the cube spawner sample graph.
fn spawner_event(event: &str, properties: &mut PropertyScope<'_>) -> Result<(), BlackboardError> {
    match event {
        "spawn" => {
            let count = properties.get_int("CUBE_COUNT")?;
            properties.set("CUBE_COUNT", count.saturating_add(1))
        }
        "met_spawner" => properties.set("MET_SPAWNER", true),
        _ => Ok(()),
    }
}

fn play(
    config: RuntimeConfig,
    path: PathBuf,
    extra: Vec<PathBuf>,
    actor: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut runtime = Runtime::new(config, TerminalHost);

    let id: GraphId = runtime.register_graph(Graph::load(&path)?)?;
    for path in extra {
        runtime.register_graph(Graph::load(&path)?)?;
    }

    runtime.register_listener(Arc::new(FnListener::new(
        |event: &str, properties: &mut PropertyScope<'_>| {
            info!(event, "event fired");
            if let Err(err) = spawner_event(event, properties) {
                warn!(event, error = %err, "listener could not update properties");
            }
        },
    )));

    let actor = ActorRef::new(actor.to_lowercase()).with_display_name(actor);
    let mut state = runtime.start_session(id, Some(actor))?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while state == SessionState::AwaitingInput {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            runtime.force_stop();
            break;
        };
        let line = line?;

        match line.trim().parse() {
            Ok(port) => state = runtime.select_option(port)?,
            Err(_) => println!("enter an option number"),
        }
    }

    println!("\n(dialogue over)");
    Ok(())
}
