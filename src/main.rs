extern crate ccdiag;
extern crate clap;
extern crate log;
extern crate num;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;

use std::fs::File;
use std::path::Path;
use ccdiag::{Arith, Conf, Engine, PointGroup, Scalar, SpinorInfo, SpinorSpace};
use ccdiag::error::{abort_with_message, Result};
use ccdiag::io::heff;
use num::complex::Complex64;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum GroupSpec {
    C1,
    Cyclic(usize),
    Table { names: Vec<String>, table: Vec<usize> },
}

impl Default for GroupSpec {
    fn default() -> Self {
        GroupSpec::C1
    }
}

impl GroupSpec {
    fn build(self) -> Result<PointGroup> {
        Ok(match self {
            GroupSpec::C1 => PointGroup::c1(),
            GroupSpec::Cyclic(n) => PointGroup::cyclic(n),
            GroupSpec::Table { names, table } => {
                PointGroup::from_table(names, table)?
            }
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Op {
    Tmplt {
        name: String,
        qparts: String,
        valence: String,
        order: String,
        #[serde(default)]
        unique: bool,
        #[serde(default)]
        irrep: Option<usize>,
    },
    Copy { src: String, target: String },
    Clear { name: String },
    Scale {
        name: String,
        re: f64,
        #[serde(default)]
        im: f64,
    },
    Rename { old: String, new: String },
    Erase { name: String },
    Findmax { name: String },
    Diffmax { a: String, b: String },
    WriteDiagram { name: String, path: String },
    ReadDiagram { path: String },
    WriteHeff {
        name: String,
        sect_h: usize,
        sect_p: usize,
        #[serde(default)]
        label: Option<String>,
    },
    WriteHeff0h0p { energy: f64 },
    PrintStack,
}

impl Op {
    fn apply<T: Scalar>(self, engine: &mut Engine<T>, outdir: &Path)
                        -> Result<()> {
        match self {
            Op::Tmplt { name, qparts, valence, order, unique, irrep } => {
                let d = match irrep {
                    Some(irrep) => engine.tmplt_sym(
                        &name, &qparts, &valence, &order, unique, irrep)?,
                    None => engine.tmplt(
                        &name, &qparts, &valence, &order, unique)?,
                };
                println!("- {{op: tmplt, diagram: {}}}", d.summary());
            }
            Op::Copy { src, target } => {
                engine.copy(&src, &target)?;
                println!("- {{op: copy, src: {:?}, target: {:?}}}", src, target);
            }
            Op::Clear { name } => {
                engine.clear(&name)?;
                println!("- {{op: clear, name: {:?}}}", name);
            }
            Op::Scale { name, re, im } => {
                engine.scale(&name, T::from_re_im(re, im))?;
                println!("- {{op: scale, name: {:?}, re: {}, im: {}}}",
                         name, re, im);
            }
            Op::Rename { old, new } => {
                engine.rename(&old, &new)?;
                println!("- {{op: rename, old: {:?}, new: {:?}}}", old, new);
            }
            Op::Erase { name } => {
                engine.erase(&name)?;
                println!("- {{op: erase, name: {:?}}}", name);
            }
            Op::Findmax { name } => {
                let (max, idx) = engine.findmax(&name)?;
                println!("- {{op: findmax, name: {:?}, max: {:e}, at: {:?}}}",
                         name, max, idx);
            }
            Op::Diffmax { a, b } => {
                let (max, idx) = engine.diffmax(&a, &b)?;
                println!("- {{op: diffmax, a: {:?}, b: {:?}, max: {:e}, at: {:?}}}",
                         a, b, max, idx);
            }
            Op::WriteDiagram { name, path } => {
                engine.write_diagram(&name, &outdir.join(&path))?;
                println!("- {{op: write_diagram, name: {:?}, path: {:?}}}",
                         name, path);
            }
            Op::ReadDiagram { path } => {
                let name = engine.read_diagram(&outdir.join(&path))?;
                println!("- {{op: read_diagram, name: {:?}, path: {:?}}}",
                         name, path);
            }
            Op::WriteHeff { name, sect_h, sect_p, label } => {
                let path = engine.write_heff(
                    &name, outdir, sect_h, sect_p,
                    label.as_ref().map(|s| s.as_str()))?;
                println!("- {{op: write_heff, name: {:?}, path: {:?}}}",
                         name, path);
            }
            Op::WriteHeff0h0p { energy } => {
                let path = heff::write_formatted_heff_0h0p(
                    outdir, T::ARITH, energy)?;
                println!("- {{op: write_heff_0h0p, energy: {}, path: {:?}}}",
                         energy, path);
            }
            Op::PrintStack => {
                print!("{}", engine.stack_summary());
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
struct Job {
    #[serde(default)]
    conf: Conf,
    #[serde(default)]
    group: GroupSpec,
    spinors: Vec<SpinorInfo>,
    #[serde(default)]
    ops: Vec<Op>,
}

fn run<T: Scalar>(job: Job, outdir: &Path) -> Result<()> {
    let conf = job.conf;
    let space = SpinorSpace::new(job.group.build()?, job.spinors,
                                 conf.tile_size)?;
    println!("conf: {{restrict_triples: {}, tile_size: {}, arith: {}}}",
             conf.restrict_triples, conf.tile_size, conf.arith);
    print!("{}", space);
    let mut engine = Engine::<T>::new(conf, space);
    println!("ops:");
    for op in job.ops {
        op.apply(&mut engine, outdir)?;
    }
    print!("{}", engine.timers());
    Ok(())
}

fn load_and_run(job_path: &Path, outdir: &Path) -> Result<()> {
    let job: Job = serde_yaml::from_reader(File::open(job_path)?)?;
    match job.conf.arith {
        Arith::Real => run::<f64>(job, outdir),
        Arith::Complex => run::<Complex64>(job, outdir),
    }
}

fn main() {
    let matches = clap::App::new(env!("CARGO_PKG_NAME"))
        .args_from_usage("--job=<job> 'YAML file with settings, spinors and operations'")
        .args_from_usage("[--outdir=<outdir>] 'Directory for output files (default: .)'")
        .args_from_usage("-v, --verbose... 'Increase log verbosity'")
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));
    let job = match matches.value_of("job") {
        Some(job) => job,
        None => abort_with_message("--job is required"),
    };
    let outdir = matches.value_of("outdir").unwrap_or(".");
    println!("job: {}", job);
    if let Err(e) = load_and_run(Path::new(job), Path::new(outdir)) {
        abort_with_message(&e.to_string());
    }
}
