use breathpace_core::catalog;
use breathpace_core::timer::PhaseSequence;
use breathpace_core::Config;
use clap::Subcommand;

use crate::render;

#[derive(Subcommand)]
pub enum PatternsAction {
    /// List built-in and custom patterns
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pattern's phase sequence
    Show {
        /// Pattern id
        id: String,
    },
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run(action: PatternsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        PatternsAction::List { json } => {
            let patterns = config.patterns();
            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
                return Ok(());
            }
            for pattern in &patterns {
                let marker = if pattern.id == config.breathing.pattern {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {:<10} {:<20} {:<9} {}",
                    pattern.id,
                    pattern.name,
                    render::timings(pattern),
                    pattern.description
                );
            }
            println!();
            println!("Cycle choices: {}", join(&catalog::CYCLE_CHOICES));
            println!(
                "Meditation presets (min): {}",
                join(&catalog::MEDITATION_PRESETS_MIN)
            );
        }
        PatternsAction::Show { id } => {
            let pattern = config.pattern(&id)?;
            let sequence = PhaseSequence::from_pattern(&pattern)?;
            println!("{} ({})", pattern.name, pattern.id);
            if !pattern.description.is_empty() {
                println!("{}", pattern.description);
            }
            for phase in sequence.phases() {
                println!(
                    "  {:<12} {}s",
                    catalog::phase_label(phase),
                    pattern.duration_of(phase)
                );
            }
            println!(
                "One cycle: {}s, {:.2} breaths/min",
                sequence.total_seconds(),
                pattern.breaths_per_minute()
            );
        }
    }
    Ok(())
}
