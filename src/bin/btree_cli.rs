use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vis_btree::{workbench::generate_keys, BTreeError, KeyOutcome, Workbench};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Json,
    Dot,
    Traverse,
}

/// Build a B-tree from a template, apply key commands and print a view of it.
#[derive(Debug, Parser)]
#[command(name = "btree-cli", version)]
struct Args {
    /// Branching order of the tree
    #[arg(short, long, default_value_t = 3)]
    order: usize,

    /// JSON snapshot to start from
    #[arg(long, conflicts_with = "sample")]
    template: Option<PathBuf>,

    /// Start from the built-in 16-key sample tree
    #[arg(long)]
    sample: bool,

    /// Insert the inclusive integer range START..=END first
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_hyphen_values = true)]
    generate: Option<Vec<i64>>,

    /// Comma separated keys to insert
    #[arg(short, long)]
    insert: Vec<String>,

    /// Comma separated keys to remove
    #[arg(short, long)]
    remove: Vec<String>,

    /// Comma separated keys to look up
    #[arg(short, long)]
    search: Vec<String>,

    #[arg(long, value_enum, default_value_t = Output::Traverse)]
    output: Output,
}

fn report(outcomes: &[KeyOutcome]) {
    for outcome in outcomes {
        if outcome.is_success() {
            log::info!("{}", outcome);
        } else {
            log::warn!("{}", outcome);
        }
    }
}

/// Apply the key commands in a fixed order: generated range, inserts,
/// removals, then lookups. Outcomes come back in that order.
fn apply(bench: &mut Workbench, args: &Args) -> Result<Vec<KeyOutcome>, BTreeError> {
    let mut outcomes = Vec::new();
    if let Some([start, end]) = args.generate.as_deref() {
        outcomes.extend(bench.insert_keys(&generate_keys(*start, *end)?)?);
    }
    for keys in &args.insert {
        outcomes.extend(bench.insert_keys(keys)?);
    }
    for keys in &args.remove {
        outcomes.extend(bench.remove_keys(keys)?);
    }
    for keys in &args.search {
        outcomes.extend(bench.search_keys(keys)?);
    }
    Ok(outcomes)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut bench = match (&args.template, args.sample) {
        (Some(path), _) => Workbench::from_template(args.order, &std::fs::read_to_string(path)?)?,
        (None, true) => Workbench::sample(args.order)?,
        (None, false) => Workbench::empty(args.order)?,
    };

    report(&apply(&mut bench, &args)?);

    let view = match args.output {
        Output::Json => bench.to_json()?,
        Output::Dot => bench.to_dot(),
        Output::Traverse => bench.traverse_json()?,
    };
    println!("{}", view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vis_btree::Key;

    fn run(argv: &[&str]) -> (Workbench, Vec<KeyOutcome>) {
        let args = Args::try_parse_from(argv).unwrap();
        let mut bench = Workbench::empty(args.order).unwrap();
        let outcomes = apply(&mut bench, &args).unwrap();
        (bench, outcomes)
    }

    fn num(n: f64) -> Key {
        Key::Number(n)
    }

    #[test]
    fn commands_run_generate_insert_remove_search() {
        let (bench, outcomes) = run(&[
            "btree-cli", "--generate", "1", "3", "-i", "4", "-r", "2,9", "-s", "2,4",
        ]);
        assert_eq!(
            outcomes,
            vec![
                KeyOutcome::Inserted(num(1.0)),
                KeyOutcome::Inserted(num(2.0)),
                KeyOutcome::Inserted(num(3.0)),
                KeyOutcome::Inserted(num(4.0)),
                KeyOutcome::Removed(num(2.0)),
                KeyOutcome::Absent(num(9.0)),
                KeyOutcome::Missing(num(2.0)),
                KeyOutcome::Found(num(4.0)),
            ]
        );
        assert_eq!(bench.traverse_json().unwrap(), "[1,3,4]");
    }

    #[test]
    fn order_does_not_follow_argument_position() {
        let (bench, outcomes) = run(&["btree-cli", "-s", "5", "-r", "5", "-i", "5"]);
        assert_eq!(
            outcomes,
            vec![
                KeyOutcome::Inserted(num(5.0)),
                KeyOutcome::Removed(num(5.0)),
                KeyOutcome::Missing(num(5.0)),
            ]
        );
        assert!(bench.tree().is_empty());
    }

    #[test]
    fn descending_range_with_negative_end() {
        let (bench, _) = run(&["btree-cli", "-o", "4", "--generate", "2", "-1"]);
        assert_eq!(bench.traverse_json().unwrap(), "[-1,0,1,2]");
        assert_eq!(bench.tree().params().order(), 4);
    }

    #[test]
    fn zero_bound_fails_before_any_insert() {
        let args = Args::try_parse_from(["btree-cli", "--generate", "0", "3"]).unwrap();
        let mut bench = Workbench::empty(3).unwrap();
        assert!(matches!(
            apply(&mut bench, &args),
            Err(BTreeError::InvalidRange { start: 0, end: 3 })
        ));
        assert!(bench.tree().is_empty());
    }
}
