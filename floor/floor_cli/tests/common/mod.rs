use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use predicates::Predicate;
use tempfile::TempDir;

/// Two racks, R0 and R1, each with two chassis of four compute nodes.
pub const LAYOUT: &str = indoc! {r#"
    {
        "sysname": "test",
        "views": {
            "Full": {
                "view-description": "Test Floor",
                "initzoom": 0,
                "zoomscales": [1, 4],
                "rackscale": 8,
                "floor": {
                    "description": "The test floor",
                    "width": 12,
                    "height": 10,
                    "content": [
                        { "name": "R0", "definition": "compute-rack", "x": 0, "y": 0 },
                        { "name": "R1", "definition": "compute-rack", "x": 6, "y": 0 }
                    ]
                },
                "definitions": {
                    "compute-rack": {
                        "description": "Compute Rack", "width": 5, "height": 10, "obscured": true,
                        "content": [
                            { "name": "CH1", "type": "compute-chassis", "x": 0, "y": 5 },
                            { "name": "CH0", "type": "compute-chassis", "x": 0, "y": 0 }
                        ]
                    },
                    "compute-chassis": {
                        "description": "Compute Chassis", "width": 5, "height": 4,
                        "content": [
                            { "name": "CN0", "type": "compute-node", "x": 0, "y": 0 },
                            { "name": "CN1", "type": "compute-node", "x": 0, "y": 1 },
                            { "name": "CN2", "type": "compute-node", "x": 0, "y": 2 },
                            { "name": "CN3", "type": "compute-node", "x": 0, "y": 3 }
                        ]
                    },
                    "compute-node": { "description": "Compute Node", "width": 5, "height": 1 }
                }
            }
        }
    }
"#};

/// One node up, one node in error, and a running job on two nodes of R0.
pub const FEED: &str = indoc! {r#"
    {
        "node_states": [
            { "lctn": "R0-CH0-CN0", "state": "A" },
            { "lctn": "R1-CH1-CN3", "state": "E" },
            { "lctn": "R9-CH0-CN0", "state": "A" }
        ],
        "jobs": [
            {
                "jobid": 42, "jobname": "hpl", "state": "S", "username": "alice",
                "numnodes": "2", "nodes": "R0-CH0-CN0 R0-CH0-CN1"
            }
        ]
    }
"#};

/// Splits each argument on spaces, so options and their values can be given together, e.g. '--zoom 1'
pub fn prepare_args(args: Vec<&str>) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(' '))
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prints the output, for inspection with `--nocapture`, and always passes.
pub fn print(label: &'static str) -> impl Predicate<str> {
    predicates::function::function(move |content: &str| {
        println!("{}:\n{}", label, content);
        true
    })
}

pub fn build_temp_file(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A temporary directory holding the layout and feed documents.
pub struct Context {
    pub temp_dir: TempDir,
    pub layout_arg: String,
    pub feed_arg: String,
    pub trace_log_arg: String,
    pub trace_log_path: PathBuf,
}

impl Context {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();

        let layout_path = build_temp_file(&temp_dir, "layout.json", LAYOUT);
        let feed_path = build_temp_file(&temp_dir, "feed.json", FEED);
        let trace_log_path = temp_dir.path().join("trace.log");

        Self {
            layout_arg: format!("--layout {}", layout_path.to_str().unwrap()),
            feed_arg: format!("--feed {}", feed_path.to_str().unwrap()),
            trace_log_arg: format!("--trace {}", trace_log_path.to_str().unwrap()),
            trace_log_path,
            temp_dir,
        }
    }

    pub fn path_arg(&self, option: &str, name: &str) -> String {
        format!("{} {}", option, self.temp_dir.path().join(name).to_str().unwrap())
    }
}
