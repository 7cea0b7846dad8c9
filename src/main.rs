//! Research Gate - Demo Entry Point
//!
//! Small interactive driver around the gate engine: one in-memory
//! colony partition, a research table, and commands to attempt area or
//! zone creation, finish research projects, and run the load-time
//! reconciliation sweep.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use research_gate::core::error::Result;
use research_gate::engine::GateEngine;
use research_gate::host::{LogMessenger, TableResearch};
use research_gate::world::{Area, EntityRef, MemoryPartition, Partition, Zone, ZoneKind};
use research_gate::GateConfig;

#[derive(Parser, Debug)]
#[command(name = "research-gate", about = "Research-gated area rules demo")]
struct Args {
    /// Gate settings TOML; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

const RESEARCH: [(&str, &str); 6] = [
    ("ResearchAreas_Stockpiles", "Stockpile Zones"),
    ("ResearchAreas_GrowingZones", "Growing Zones"),
    ("ResearchAreas_AnimalAreas", "Animal Areas"),
    ("ResearchAreas_Home", "Home Areas"),
    ("ResearchAreas_NoRoof", "Roof Management"),
    ("ResearchAreas_Allowed", "Allowed Areas"),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("research_gate=debug")
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };

    let mut research = TableResearch::new();
    for (identifier, label) in RESEARCH {
        research.insert(identifier, label, false);
    }
    let mut engine = GateEngine::new(config, research);

    let mut partition = MemoryPartition::new("Demo Colony");
    partition.add_default_area("Home");
    partition.add_area(Area::new("Old Stockpile"));
    partition.add_zone(Zone::new("Farm", ZoneKind::Growing).with_contents(3));

    let mut messenger = LogMessenger;
    let mut tick = 0u64;

    println!("\n=== RESEARCH GATE ===");
    println!("Area and zone creation gated behind research completion");
    println!();
    println!("Commands:");
    println!("  tick / t            - Advance one tick");
    println!("  run <n>             - Advance n ticks");
    println!("  area <label>        - Attempt to create an area");
    println!("  zone <kind> <label> - Attempt to create a zone (stockpile/growing)");
    println!("  finish <identifier> - Mark a research project complete");
    println!("  load                - Simulate session load (refresh + sweep)");
    println!("  status / s          - Show live areas and zones");
    println!("  quit / q            - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["tick"] | ["t"] => {
                tick += 1;
                engine.on_periodic_tick(tick);
            }
            ["run", count] => {
                let count: u64 = count.parse().unwrap_or(1);
                for _ in 0..count {
                    tick += 1;
                    engine.on_periodic_tick(tick);
                }
                println!("Now at tick {}", tick);
            }
            ["area", rest @ ..] if !rest.is_empty() => {
                let area = Area::new(rest.join(" "));
                let verdict = engine.on_entity_create_attempt(
                    Some(EntityRef::Area(&area)),
                    &partition,
                    &mut messenger,
                );
                if verdict.is_allow() {
                    println!("Created area '{}'", area.label);
                    partition.add_area(area);
                } else {
                    println!("Blocked: {}", verdict.reason().unwrap_or("denied"));
                }
            }
            ["zone", kind, rest @ ..] if !rest.is_empty() => {
                let kind = match *kind {
                    "stockpile" => ZoneKind::Stockpile,
                    "growing" => ZoneKind::Growing,
                    _ => ZoneKind::Other,
                };
                let zone = Zone::new(rest.join(" "), kind);
                let verdict = engine.on_entity_create_attempt(
                    Some(EntityRef::Zone(&zone)),
                    &partition,
                    &mut messenger,
                );
                if verdict.is_allow() {
                    println!("Created zone '{}'", zone.label);
                    partition.add_zone(zone);
                } else {
                    println!("Blocked: {}", verdict.reason().unwrap_or("denied"));
                }
            }
            ["finish", identifier] => {
                if engine.research_mut().set_complete(identifier, true) {
                    engine.on_settings_changed();
                    println!("Completed {}", identifier);
                } else {
                    println!("Unknown research '{}'", identifier);
                }
            }
            ["load"] => {
                let mut partitions: [&mut dyn Partition; 1] = [&mut partition];
                let report = engine.on_session_load(&mut partitions, &mut messenger);
                if report.is_empty() {
                    println!("Sweep removed nothing");
                } else {
                    for line in report.summaries() {
                        println!("{}", line);
                    }
                }
            }
            ["status"] | ["s"] => {
                println!("Tick {}", tick);
                for area in partition.areas() {
                    let marker = if Some(area.id) == partition.default_area() {
                        " (default)"
                    } else {
                        ""
                    };
                    println!("  area: {}{}", area.label, marker);
                }
                for zone in partition.zones() {
                    println!(
                        "  zone: {} [{:?}] ({} things)",
                        zone.label, zone.kind, zone.contained_things
                    );
                }
            }
            ["quit"] | ["q"] => break,
            [] => {}
            _ => println!("Unrecognized command"),
        }
    }

    Ok(())
}
