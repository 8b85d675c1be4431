//! GOSP CLI
//!
//! Usage:
//!   gosp                                   # Interactive session REPL
//!   gosp --lock                            # Interactive lock verification
//!   gosp --serve                           # HTTP + WebSocket API server
//!   gosp -c "place hb4 glycerol" -c state  # Run commands and exit
//!   gosp --config gosp.toml --seed 7 -vv   # Config file, overrides, logging

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing::info;

use gosp::config::{CliOverrides, GospConfig};
use gosp::core::command::HELP;
use gosp::core::{
    parse_command, placement_for, run_server, snap_placement, valid_transitions, Catalog, Command,
    LockMachine, SessionStore,
};
use gosp::logging::setup_logging;
use gosp::types::{
    orphan_protein, DispatchOutput, DsmState, Intent, LockEvent, LockOutput, LockState, Selection,
};
use gosp::{GospError, Result, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "gosp",
    version = VERSION,
    about = "GOSP - place stabilizers on dehydrons and track folding state",
    long_about = "GOSP drives a protein stabilization session: wrap under-protected\n\
                  hydrogen bonds (dehydrons) with up to three stabilizer molecules\n\
                  until the structure reaches STABILIZED.\n\n\
                  Modes:\n  \
                  (default)  Session REPL\n  \
                  --lock     SEARCH -> ALIGN -> LOCK verification for YBR032W\n  \
                  --serve    HTTP + WebSocket API server\n\n\
                  States:\n  \
                  UNFOLDED   - Random coil\n  \
                  FOLDING    - Secondary structure forming\n  \
                  NATIVE     - Folded structure\n  \
                  BREATHING  - Fluctuations expose dehydrons\n  \
                  STABILIZED - All dehydrons wrapped"
)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Lock verification mode
    #[arg(short, long)]
    lock: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long)]
    addr: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output
    #[arg(short, long)]
    quiet: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run this command line and exit (repeatable)
    #[arg(short, long = "command")]
    command: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let overrides = CliOverrides {
        seed: args.seed,
        addr: args.addr.clone(),
        verbosity: (args.verbose > 0).then_some(args.verbose),
        log_file: args.log_file.clone(),
    };
    let config = GospConfig::load(args.config.as_deref(), &overrides)?;
    setup_logging(config.verbosity, args.quiet, config.log_file.as_deref())?;

    let catalog = Arc::new(Catalog::generate(&config.catalog));
    info!(
        seed = config.catalog.seed,
        residues = catalog.residues().len(),
        dehydrons = catalog.dehydron_count(),
        "catalog generated"
    );

    if args.serve {
        print_header("API Server");
        println!("  GET  /health                 - Health check");
        println!("  GET  /catalog                - Residues, bonds, voids, templates");
        println!("  POST /session/new            - Create session");
        println!("  GET  /session/:id            - Snapshot and derived values");
        println!("  POST /session/:id/dispatch   - Apply intent");
        println!("  POST /session/:id/click      - Snap point and place");
        println!("  POST /lock/new               - Create lock verification");
        println!("  POST /lock/:id/event         - Send lock event");
        println!("  WS   /ws/:id                 - Live snapshots");
        println!("Listening on {}", config.addr.to_string().bold());
        return run_server(config.addr, catalog).await;
    }

    let out = Output { json: args.json, color: !args.no_color };
    if args.lock {
        let mut mode = LockMode { machine: LockMachine::new(), out };
        drive(&mut mode, &args.command, "Lock Verification")
    } else {
        let mut mode = SessionMode { store: SessionStore::new(catalog), out };
        drive(&mut mode, &args.command, "Session")
    }
}

// =============================================================================
// REPL
// =============================================================================

/// A REPL flavour: prompt + command execution
trait Mode {
    fn prompt(&self) -> String;
    /// `Ok(false)` ends the loop
    fn execute(&mut self, command: Command) -> Result<bool>;
}

/// Run `commands` if given, otherwise read stdin interactively
fn drive(mode: &mut dyn Mode, commands: &[String], title: &str) -> Result<()> {
    if !commands.is_empty() {
        for line in commands {
            if !mode.execute(parse_command(line)?)? {
                break;
            }
        }
        return Ok(());
    }

    print_header(title);
    println!("Type 'help' for commands, 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", mode.prompt());
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keep_going = match parse_command(line) {
            Ok(command) => match mode.execute(command) {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    println!("{}", e.to_string().red());
                    true
                }
            },
            Err(e) => {
                println!("{}", e.to_string().red());
                true
            }
        };
        if !keep_going {
            break;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
    color: bool,
}

// =============================================================================
// SESSION MODE
// =============================================================================

struct SessionMode {
    store: SessionStore,
    out: Output,
}

impl SessionMode {
    fn dispatch(&mut self, intent: &Intent) -> Result<()> {
        let output = self.store.dispatch(intent);
        self.print_dispatch(&output)
    }

    fn print_dispatch(&self, output: &DispatchOutput) -> Result<()> {
        if self.out.json {
            println!("{}", serde_json::to_string_pretty(output)?);
            return Ok(());
        }
        if self.out.color {
            println!("{}", output.to_terminal_string());
            println!("  {}", output.reason.description().dimmed());
        } else {
            println!("{}", output.to_parseable_string());
        }
        if let Some(text) = &output.cascade_text {
            println!("  VDEM [{}/5] {}", output.cascade_step + 1, text.cyan());
        }
        Ok(())
    }

    fn print_state(&self) -> Result<()> {
        if self.out.json {
            println!("{}", serde_json::to_string_pretty(&self.store.view()?)?);
            return Ok(());
        }
        let state = self.store.state();
        let catalog = self.store.catalog();
        let breathing = if state.breathing_enabled { "on" } else { "off" };
        println!(
            "DSM: {} ({}, breathing {}, speed {:.2})",
            state.dsm_state.to_string().bold(),
            state.dsm_state.description(),
            breathing,
            state.breathing_speed
        );
        let tool = match state.selected_template {
            Some(template) if state.is_placing() => format!("place_stabilizer ({})", template),
            _ => "inspect".to_string(),
        };
        println!("Tool: {}", tool);
        println!("Stabilizers ({}/{}):", state.placed_count(), gosp::MAX_STABILIZERS);
        for s in &state.placed_stabilizers {
            println!("  {} {} -> {}", s.id, s.template_id, s.target_dehydron_id.green());
        }
        let unwrapped: Vec<&str> = catalog
            .unwrapped_dehydrons(state)
            .into_iter()
            .map(|b| b.id.as_str())
            .collect();
        println!(
            "Wrapped: {}/{} | exposed: {}",
            state.wrapped_dehydrons.len(),
            catalog.dehydron_count(),
            if unwrapped.is_empty() { "-".to_string() } else { unwrapped.join(" ").yellow().to_string() }
        );
        match state.cascade.current_step() {
            Some(step) => println!("Cascade: [{}/5] {}", state.cascade.current_index() + 1, step),
            None => println!("Cascade: idle"),
        }
        match &state.selection {
            Selection::None => println!("Selection: none"),
            Selection::Residue(i) => match catalog.residue(*i) {
                Some(r) => println!("Selection: residue {} ({})", i, r.amino_acid.name()),
                None => println!("Selection: residue {}", i),
            },
            Selection::Bond(id) => println!("Selection: bond {}", id),
        }
        println!("Revision: {}", self.store.revision());
        Ok(())
    }

    fn print_catalog(&self) -> Result<()> {
        let catalog = self.store.catalog();
        if self.out.json {
            println!("{}", serde_json::to_string_pretty(&**catalog)?);
            return Ok(());
        }
        println!("{} residues, {} hydrogen bonds", catalog.residues().len(), catalog.bonds().len());
        println!("Dehydrons:");
        for bond in catalog.dehydrons() {
            let m = bond.midpoint;
            println!(
                "  {:<5} r{} -> r{}  wrapping={:<2}  midpoint=({:.2}, {:.2}, {:.2})",
                bond.id.as_str().yellow(),
                bond.donor,
                bond.acceptor,
                bond.wrapping_count,
                m[0],
                m[1],
                m[2]
            );
        }
        println!("Voids:");
        for void in catalog.voids() {
            println!(
                "  {} radius={:.2} water={} near [{}]",
                void.id,
                void.radius,
                void.frustrated_water_count,
                void.nearby_dehydrons.join(", ")
            );
        }
        println!("Templates:");
        for t in catalog.templates() {
            println!("  {:<10} +{} wrapping, {} atoms - {}", t.id.as_str(), t.wrapping_bonus, t.atom_count, t.description);
        }
        Ok(())
    }

    fn print_transitions(&self) -> Result<()> {
        let from = self.store.state().dsm_state;
        let targets = valid_transitions(from);
        if self.out.json {
            println!("{}", serde_json::to_string_pretty(&targets)?);
        } else {
            let names: Vec<String> = targets.iter().map(DsmState::to_string).collect();
            println!("{} -> {}", from, names.join(", "));
        }
        Ok(())
    }
}

impl Mode for SessionMode {
    fn prompt(&self) -> String {
        let state = self.store.state();
        let wrapped = format!("{}/{}", state.wrapped_dehydrons.len(), self.store.catalog().dehydron_count());
        if self.out.color {
            format!(
                "{}[{} | {}]{} > ",
                state.dsm_state.color_code(),
                state.dsm_state,
                wrapped,
                DsmState::color_reset()
            )
        } else {
            format!("[{} | {}] > ", state.dsm_state, wrapped)
        }
    }

    fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Dispatch(intent) => self.dispatch(&intent)?,
            Command::Place { dehydron, template } => {
                let template = template.or(self.store.state().selected_template).ok_or_else(|| {
                    GospError::Command("no template armed: use 'template <name>' or 'place <dehydron> <template>'".into())
                })?;
                let intent = placement_for(self.store.catalog(), &dehydron, template);
                self.dispatch(&intent)?;
            }
            Command::Click(point) => {
                match snap_placement(self.store.state(), self.store.catalog(), point) {
                    Some(intent) => self.dispatch(&intent)?,
                    None if !self.store.state().is_placing() => {
                        println!("{}", "placement tool not armed (use 'template <name>')".yellow())
                    }
                    None => println!(
                        "{}",
                        format!("no exposed dehydron within {:.1} of the point", gosp::PLACEMENT_SNAP_DISTANCE).yellow()
                    ),
                }
            }
            Command::Reset => self.dispatch(&Intent::Reset)?,
            Command::State => self.print_state()?,
            Command::Catalog => self.print_catalog()?,
            Command::Transitions => self.print_transitions()?,
            Command::Help => println!("{}", HELP),
            Command::Quit => {
                println!("\nSession ended at revision {}.", self.store.revision());
                return Ok(false);
            }
            Command::Identify(_) | Command::Verify { .. } => {
                return Err(GospError::Command("lock commands need --lock".into()));
            }
        }
        Ok(true)
    }
}

// =============================================================================
// LOCK MODE
// =============================================================================

struct LockMode {
    machine: LockMachine,
    out: Output,
}

impl LockMode {
    fn print(&self, output: &LockOutput) -> Result<()> {
        if self.out.json {
            println!("{}", serde_json::to_string_pretty(output)?);
            return Ok(());
        }
        let ctx = &output.context;
        let line = format!(
            "state={} | energy={:.2} | ramachandran={} | fidelity={:.2} | locked={} | reason={}",
            output.state,
            ctx.energy_potential,
            ctx.ramachandran_valid,
            ctx.fidelity_score,
            ctx.is_physically_locked,
            output.reason.code()
        );
        if self.out.color {
            println!("{}{}{}", output.state.color_code(), line, LockState::color_reset());
            println!("  {}", output.reason.description().dimmed());
        } else {
            println!("{}", line);
        }
        Ok(())
    }
}

impl Mode for LockMode {
    fn prompt(&self) -> String {
        let state = self.machine.state();
        if self.out.color {
            format!("{}[{}]{} > ", state.color_code(), state, LockState::color_reset())
        } else {
            format!("[{}] > ", state)
        }
    }

    fn execute(&mut self, command: Command) -> Result<bool> {
        let output = match command {
            Command::Identify(point) => self.machine.send(LockEvent::IdentifyVoid {
                coordinates: point.unwrap_or_else(|| orphan_protein().void_target()),
            }),
            Command::Verify { energy, ramachandran_valid } => self.machine.send(LockEvent::VerifyMa {
                energy_potential: energy.unwrap_or(-17.2),
                ramachandran_valid: ramachandran_valid.unwrap_or(true),
            }),
            Command::Reset => self.machine.reset(),
            Command::State => self.machine.current_output(),
            Command::Help => {
                println!("{}", HELP);
                return Ok(true);
            }
            Command::Quit => {
                let verdict = if self.machine.state() == LockState::Lock { "locked" } else { "not locked" };
                println!("\nVerification ended ({}).", verdict);
                return Ok(false);
            }
            _ => return Err(GospError::Command("session commands are not available with --lock".into())),
        };
        self.print(&output)?;
        Ok(true)
    }
}

fn print_header(mode: &str) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  GOSP v{} - {}", VERSION, mode).bold());
    println!("{}", "========================================".bold());
    println!();
}
