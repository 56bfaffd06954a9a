//! Results persistence module

use crate::cluster::{cluster_density, Algorithm, EvaluationStats, Partition};
use crate::config::Config;
use crate::graph::GraphStore;
use anyhow::{Context, Result};
use serde_json::{json, to_string_pretty, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Everything needed to describe one clustering run on disk
pub struct RunResults<'a> {
    pub algorithm: Algorithm,
    pub graph: &'a GraphStore,
    pub partition: &'a Partition,
    pub stats: &'a EvaluationStats,
    pub config: &'a Config,
}

/// Save `summary.json` and `clusters.json` to the specified directory
pub fn save_results<P: AsRef<Path>>(results: &RunResults<'_>, output_dir: P) -> Result<()> {
    let output_dir = output_dir.as_ref();
    log::info!(
        "Saving {} clusters to {}",
        results.partition.len(),
        output_dir.display()
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    write_json(&output_dir.join("summary.json"), &summary(results))?;
    write_json(&output_dir.join("clusters.json"), &clusters(results))?;

    log::info!("Results saved successfully");
    Ok(())
}

fn summary(results: &RunResults<'_>) -> Value {
    let graph = results.graph;
    let avg_degree = if graph.node_count() == 0 {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / graph.node_count() as f64
    };

    json!({
        "algorithm": results.algorithm,
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "avg_degree": avg_degree,
        },
        "cluster_stats": results.stats,
        "clustered_nodes": results.partition.member_count(),
        "config": results.config,
    })
}

fn clusters(results: &RunResults<'_>) -> Value {
    let clusters: Vec<Value> = results
        .partition
        .iter()
        .enumerate()
        .map(|(id, members)| {
            json!({
                "id": id,
                "size": members.len(),
                "density": cluster_density(results.graph, members),
                "members": members,
            })
        })
        .collect();

    json!({ "clusters": clusters })
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(to_string_pretty(value)?.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
