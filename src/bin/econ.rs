//! Interactive menu over a city or country registry.
//!
//! Usage:
//!   econ [--entity <city|country>] [--file <path>]
//!
//! City mode (default) offers add, display, richest, write, read and exit.
//! Country mode asks for a batch of countries up front, round-trips them
//! through the snapshot file, then offers richest, display and exit.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use econ_avl::{Config, Entity, Insertion, Profile, Registry};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    City,
    Country,
}

impl Mode {
    fn entity(self) -> Entity {
        match self {
            Mode::City => Entity::City,
            Mode::Country => Entity::Country,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "econ")]
#[command(about = "Keep city or country economic records in an AVL tree")]
struct Args {
    /// Kind of record to manage
    #[arg(long, value_enum, default_value_t = Mode::City)]
    entity: Mode,

    /// Snapshot file (default: <entity>_records.txt)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Args {
    fn entity(&self) -> Entity {
        self.entity.entity()
    }

    fn snapshot_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_records.txt", self.entity().noun())))
    }
}

/// Line-oriented prompt over stdin. `None` means input ended.
struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_parsed<T: FromStr>(&mut self, label: &str) -> io::Result<Option<T>> {
        loop {
            let Some(raw) = self.ask(label)? else {
                return Ok(None);
            };
            match raw.parse() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => println!("Invalid number {:?}, please try again.", raw),
            }
        }
    }

    fn ask_record(&mut self, noun: &str) -> io::Result<Option<(String, Profile)>> {
        let Some(name) = self.ask(&format!("Enter {} name: ", noun))? else {
            return Ok(None);
        };
        let Some(population) = self.ask_parsed("Enter population: ")? else {
            return Ok(None);
        };
        let Some(budget) = self.ask_parsed("Enter budget: ")? else {
            return Ok(None);
        };
        let Some(income) = self.ask_parsed("Enter income: ")? else {
            return Ok(None);
        };
        let Some(spending) = self.ask_parsed("Enter spending: ")? else {
            return Ok(None);
        };
        Ok(Some((name, Profile::new(population, budget, income, spending))))
    }
}

fn print_record(entity: Entity, name: &str, p: &Profile) {
    let e = &p.economy;
    match entity {
        Entity::City => {
            println!("City: {}", name);
            println!("Population: {}", p.population);
            println!(
                "Economic Strength (Budget: {:.2}, Income: {:.2}, Spending: {:.2})",
                e.budget, e.income, e.spending
            );
        }
        Entity::Country => {
            println!("Country Name: {}", name);
            println!("Population: {}", p.population);
            println!("Budget: {:.2}", e.budget);
            println!("Income: {:.2}", e.income);
            println!("Spending: {:.2}", e.spending);
        }
    }
    println!();
}

fn display_all(registry: &Registry, entity: Entity) {
    if registry.is_empty() {
        println!("No {} records.", entity.noun());
    }
    for (name, p) in registry.iter() {
        print_record(entity, name, p);
    }
}

fn show_richest(registry: &Registry, entity: Entity) {
    match registry.richest() {
        Some((name, p)) => {
            println!("Richest {}:", entity.noun());
            print_record(entity, name, p);
        }
        None => println!("No {} records found.", entity.noun()),
    }
}

fn add_record(registry: &mut Registry, entity: Entity, name: &str, profile: Profile) {
    match registry.insert(name, profile) {
        Ok(Insertion::Inserted) => println!("Added {}.", name),
        Ok(Insertion::Updated(_)) => println!("Updated {}.", name),
        Ok(Insertion::Rejected(_)) => {
            println!("A {} named {} already exists; kept the existing record.", entity.noun(), name)
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn run_city<R: BufRead>(prompt: &mut Prompt<R>, file: &Path) -> io::Result<()> {
    let entity = Entity::City;
    let mut registry = Registry::new(entity);
    loop {
        println!("1. Add city record");
        println!("2. Display city records");
        println!("3. Find the city with the highest economic strength");
        println!("4. Write city records to file");
        println!("5. Read city records from file");
        println!("6. Exit");
        let Some(choice) = prompt.ask_parsed::<u32>("Enter your choice: ")? else {
            break;
        };
        match choice {
            1 => {
                let Some((name, profile)) = prompt.ask_record(entity.noun())? else {
                    break;
                };
                add_record(&mut registry, entity, &name, profile);
            }
            2 => display_all(&registry, entity),
            3 => show_richest(&registry, entity),
            4 => match registry.write_snapshot(file) {
                Ok(n) => println!("{} city records written to {}.", n, file.display()),
                Err(e) => println!("Error: {}", e),
            },
            5 => match registry.merge_snapshot(file) {
                Ok(n) => println!("{} new city records read from {}.", n, file.display()),
                Err(e) => println!("Error: {}", e),
            },
            6 => break,
            _ => println!("Invalid choice. Please try again."),
        }
        println!();
    }
    registry.clear();
    println!("Exiting program.");
    Ok(())
}

fn run_country<R: BufRead>(prompt: &mut Prompt<R>, file: &Path) -> io::Result<()> {
    let entity = Entity::Country;
    let mut registry = Registry::new(entity);

    let Some(count) = prompt.ask_parsed::<usize>("Enter the number of countries: ")? else {
        return Ok(());
    };
    for i in 0..count {
        println!("Enter information for Country {}:", i + 1);
        let Some((name, profile)) = prompt.ask_record(entity.noun())? else {
            return Ok(());
        };
        add_record(&mut registry, entity, &name, profile);
        println!();
    }

    // Persist and reload so the session works from what is on disk.
    if let Err(e) = registry.write_snapshot(file) {
        println!("Error: {}", e);
    } else {
        match Registry::load(file, Config::country()) {
            Ok(loaded) => registry = loaded,
            Err(e) => println!("Error: {}", e),
        }
    }

    loop {
        println!("1. Find the richest country");
        println!("2. Display all countries");
        println!("3. Exit");
        let Some(choice) = prompt.ask_parsed::<u32>("Enter your choice: ")? else {
            break;
        };
        match choice {
            1 => show_richest(&registry, entity),
            2 => {
                println!("All Countries:");
                display_all(&registry, entity);
            }
            3 => break,
            _ => println!("Invalid choice. Please try again.\n"),
        }
    }
    registry.clear();
    println!("Exiting...");
    Ok(())
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let file = args.snapshot_path();
    let stdin = io::stdin();
    let mut prompt = Prompt {
        input: stdin.lock(),
    };
    match args.entity() {
        Entity::City => run_city(&mut prompt, &file),
        Entity::Country => run_country(&mut prompt, &file),
    }
}
