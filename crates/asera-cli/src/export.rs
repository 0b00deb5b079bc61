//! CSV Export
//!
//! Tabular export of a finished run: one aggregate file (per-tick population
//! statistics) and one per-agent file (every recorded history row). Consumes
//! only the engine's accessors; the engine itself never writes files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use asera_core::{Simulation, TimeSeries};

/// Write `<prefix>_aggregate.csv` and `<prefix>_agents.csv`.
pub fn export_run(sim: &mut Simulation, prefix: &str) -> std::io::Result<()> {
    write_aggregate(
        Path::new(&format!("{prefix}_aggregate.csv")),
        sim.time_series(),
    )?;
    write_agents(Path::new(&format!("{prefix}_agents.csv")), sim)
}

fn write_aggregate(path: &Path, series: &TimeSeries) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "tick,mean_wealth,gini,mean_competence")?;
    for point in &series.points {
        writeln!(
            w,
            "{},{},{},{}",
            point.tick, point.mean_wealth, point.gini, point.mean_competence
        )?;
    }
    w.flush()
}

fn write_agents(path: &Path, sim: &mut Simulation) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "tick,agent_id,wealth,tax_paid,influence,status,responsibility,self_esteem,\
         willpower,ambition,competence,inspiration,action_level,alpha,beta,gamma"
    )?;
    let views = sim.agents();
    for view in views {
        let Some(history) = sim.agent_history(view.id) else {
            continue;
        };
        for r in &history {
            writeln!(
                w,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                r.tick,
                view.id,
                r.wealth,
                r.tax_paid,
                r.influence,
                r.status,
                r.responsibility,
                r.self_esteem,
                r.willpower,
                r.ambition,
                r.competence,
                r.inspiration,
                r.action_level,
                r.alpha,
                r.beta,
                r.gamma
            )?;
        }
    }
    w.flush()
}
