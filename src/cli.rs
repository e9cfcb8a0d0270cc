use crate::data::config::{load_config, resolve_config_path, SpotterConfig};
use crate::data::puzzle::{load_puzzle, DEFAULT_PUZZLE_PATH};
use crate::data::roster::{load_roster, Crew, DEFAULT_ROSTER_PATH};
use crate::data::spotter_store::{load_spotter, save_spotter};
use crate::data::trait_names::{apply_trait_names, load_trait_names, DEFAULT_TRAIT_NAMES_PATH};
use crate::data::validate::validate_puzzle_snapshot;
use crate::solver::{
    apply_combo, apply_partial, apply_single_trait, derive, export_groups_csv, FinderReport,
    Puzzle, SingleTraitOutcome, Spotter, UsableFilter,
};
use crate::utility::{crew_utility, score_utility};

const USAGE: &str = "usage: spotter <rarities|groups|solve|attempt|export|utility|validate>";
const VALUE_FLAGS: &[&str] = &["--puzzle", "--roster", "--names"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rarities,
    Groups,
    Solve,
    Attempt,
    Export,
    Utility,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("rarities") => Some(Command::Rarities),
        Some("groups") => Some(Command::Groups),
        Some("solve") => Some(Command::Solve),
        Some("attempt") => Some(Command::Attempt),
        Some("export") => Some(Command::Export),
        Some("utility") => Some(Command::Utility),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let config = match load_config(&resolve_config_path()) {
        Ok(config) => config.with_env_overrides(),
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    match command {
        Command::Rarities => handle_rarities(args, &config),
        Command::Groups => handle_groups(args, &config),
        Command::Solve => handle_solve(args, &config),
        Command::Attempt => handle_attempt(args, &config),
        Command::Export => handle_export(args, &config),
        Command::Utility => handle_utility(args, &config),
        Command::Validate => handle_validate(args),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|position| args.get(position + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Arguments after the command word that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut values = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(2) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        values.push(arg.as_str());
    }
    values
}

/// Puzzle with display names merged in when a names file is present.
fn read_puzzle(args: &[String]) -> Result<Puzzle, String> {
    let path = flag_value(args, "--puzzle").unwrap_or(DEFAULT_PUZZLE_PATH);
    let puzzle = load_puzzle(path).map_err(|err| format!("{path}: {err}"))?;

    let names_path = flag_value(args, "--names");
    match names_path {
        Some(names_path) => {
            let names = load_trait_names(names_path).map_err(|err| format!("{names_path}: {err}"))?;
            Ok(apply_trait_names(&puzzle, &names))
        }
        None => match load_trait_names(DEFAULT_TRAIT_NAMES_PATH) {
            Ok(names) => Ok(apply_trait_names(&puzzle, &names)),
            Err(_) => Ok(puzzle),
        },
    }
}

fn read_roster(args: &[String]) -> Result<Vec<Crew>, String> {
    let path = flag_value(args, "--roster").unwrap_or(DEFAULT_ROSTER_PATH);
    load_roster(path).map_err(|err| format!("{path}: {err}"))
}

fn read_report(args: &[String], config: &SpotterConfig) -> Result<(Puzzle, FinderReport), String> {
    let puzzle = read_puzzle(args)?;
    let roster = read_roster(args)?;
    let spotter = load_spotter(&config.store_dir, &config.user_key, &puzzle.id)
        .map_err(|err| err.to_string())?;
    let report = derive(&puzzle, &roster, &spotter, &config.finder).map_err(|err| err.to_string())?;
    if report.filters_may_hide_solutions {
        eprintln!("note: active filters may hide the correct solution");
    }
    Ok((puzzle, report))
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_rarities(args: &[String], config: &SpotterConfig) -> i32 {
    match read_report(args, config) {
        Ok((_, report)) => {
            let tables: Vec<_> = report.nodes.iter().map(|node| &node.rarities).collect();
            print_json(&tables, "rarity tables")
        }
        Err(err) => {
            eprintln!("rarities failed: {err}");
            1
        }
    }
}

fn handle_groups(args: &[String], config: &SpotterConfig) -> i32 {
    let (puzzle, report) = match read_report(args, config) {
        Ok(derived) => derived,
        Err(err) => {
            eprintln!("groups failed: {err}");
            return 1;
        }
    };

    if !has_flag(args, "--table") {
        let groups: Vec<_> = report.nodes.iter().map(|node| &node.groups).collect();
        return print_json(&groups, "candidate groups");
    }

    println!("node\ttraits\trarity\tcrew");
    for candidates in &report.nodes {
        if candidates.groups.is_empty() {
            println!("{}\t-\t0\t(no matching crew)", candidates.node + 1);
            continue;
        }
        for group in &candidates.groups.groups {
            let traits: Vec<_> = group.traits.iter().map(|t| puzzle.trait_name(t)).collect();
            let crew: Vec<_> = group.crew.iter().map(|s| report.crew_name(s)).collect();
            println!(
                "{}\t{}\t{}\t{}",
                candidates.node + 1,
                traits.join(" + "),
                group.rarity,
                crew.join(", ")
            );
        }
    }
    0
}

fn handle_solve(args: &[String], config: &SpotterConfig) -> i32 {
    let values = positional(args);
    let Some((raw_node, traits)) = values.split_first() else {
        eprintln!("usage: spotter solve <node> <trait> [<trait>...] [--partial]");
        return 2;
    };
    let Ok(node_index) = raw_node.parse::<usize>() else {
        eprintln!("invalid node index '{raw_node}'");
        return 2;
    };
    if traits.is_empty() {
        eprintln!("usage: spotter solve <node> <trait> [<trait>...] [--partial]");
        return 2;
    }

    let puzzle = match read_puzzle(args) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("solve failed: {err}");
            return 1;
        }
    };
    let result = load_spotter(&config.store_dir, &config.user_key, &puzzle.id)
        .map_err(|err| err.to_string())
        .and_then(|spotter| {
            let current = spotter.apply_to(&puzzle).map_err(|err| err.to_string())?;
            let node = current.node(node_index).map_err(|err| err.to_string())?;
            let solved = if let [single] = traits {
                match apply_single_trait(node, single).map_err(|err| err.to_string())? {
                    SingleTraitOutcome::Solved(node) => node,
                    SingleTraitOutcome::NeedsConfirmation { hidden_left, .. }
                        if !has_flag(args, "--partial") =>
                    {
                        return Err(format!(
                            "node {node_index} has {hidden_left} hidden trait(s) left; \
                             pass --partial to confirm '{single}' as one of them"
                        ));
                    }
                    SingleTraitOutcome::NeedsConfirmation { .. } => {
                        apply_partial(node, single).map_err(|err| err.to_string())?
                    }
                }
            } else {
                let combo: Vec<String> = traits.iter().map(|t| t.to_string()).collect();
                apply_combo(node, &combo).map_err(|err| err.to_string())?
            };
            let next = spotter.record_node(&solved);
            save_spotter(&config.store_dir, &config.user_key, &next).map_err(|err| err.to_string())?;
            Ok(solved)
        });

    match result {
        Ok(node) => {
            let slots: Vec<String> = node.solve.iter().map(ToString::to_string).collect();
            println!(
                "node {} {}: {}",
                node.index,
                node.state().as_str(),
                slots.join(", ")
            );
            0
        }
        Err(err) => {
            eprintln!("solve failed: {err}");
            1
        }
    }
}

fn handle_attempt(args: &[String], config: &SpotterConfig) -> i32 {
    let values = positional(args);
    let Some(symbol) = values.first() else {
        eprintln!("usage: spotter attempt <crew-symbol>");
        return 2;
    };

    let result = read_puzzle(args).and_then(|puzzle| {
        let spotter: Spotter = load_spotter(&config.store_dir, &config.user_key, &puzzle.id)
            .map_err(|err| err.to_string())?;
        let next = spotter.mark_attempted(symbol);
        save_spotter(&config.store_dir, &config.user_key, &next).map_err(|err| err.to_string())?;
        Ok(next.attempted_crew.len())
    });

    match result {
        Ok(count) => {
            println!("attempted: {symbol} ({count} crew tried)");
            0
        }
        Err(err) => {
            eprintln!("attempt failed: {err}");
            1
        }
    }
}

fn handle_export(args: &[String], config: &SpotterConfig) -> i32 {
    let exported = read_report(args, config).and_then(|(puzzle, report)| {
        export_groups_csv(&report, &puzzle, &config.export).map_err(|err| err.to_string())
    });
    match exported {
        Ok(csv) => {
            print!("{csv}");
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_utility(args: &[String], config: &SpotterConfig) -> i32 {
    let values = positional(args);
    let Some(symbol) = values.first() else {
        eprintln!("usage: spotter utility <crew-symbol> [--owned|--thawed]");
        return 2;
    };
    let roster = match read_roster(args) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("utility failed: {err}");
            return 1;
        }
    };
    if !roster.iter().any(|crew| crew.symbol == *symbol) {
        eprintln!("utility failed: no crew '{symbol}' in roster");
        return 1;
    }

    let usable = if has_flag(args, "--thawed") {
        UsableFilter::Thawed
    } else if has_flag(args, "--owned") {
        UsableFilter::Owned
    } else {
        UsableFilter::All
    };
    let pool: Vec<Crew> = roster.into_iter().filter(|crew| usable.admits(crew)).collect();

    let ranks = score_utility(&pool, &config.utility);
    let utility = crew_utility(symbol, &ranks, &config.utility.thresholds);
    print_json(&utility, "crew utility")
}

fn handle_validate(args: &[String]) -> i32 {
    let path = flag_value(args, "--puzzle")
        .or_else(|| positional(args).first().copied())
        .unwrap_or(DEFAULT_PUZZLE_PATH);

    match validate_puzzle_snapshot(path) {
        Ok(report) => {
            for diag in &report.diagnostics {
                eprintln!("{}: {}: {}", diag.severity, diag.context, diag.message);
            }
            if report.has_errors() {
                eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
                1
            } else {
                println!("validation passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
