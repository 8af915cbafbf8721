//! By-name operations on the diagram stack.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use super::conf::Conf;
use super::diagram::{self, Diagram};
use super::error::{Result, shape_mismatch};
use super::io::{dgfile, heff};
use super::linalg::Scalar;
use super::spinors::SpinorSpace;
use super::stack::DiagramStack;
use super::timer::Timers;

/// Owns the diagrams of one calculation together with the spinor space
/// they are built over.
#[derive(Debug)]
pub struct Engine<T> {
    pub conf: Conf,
    space: Arc<SpinorSpace>,
    stack: DiagramStack<T>,
    timers: Timers,
}

impl<T: Scalar> Engine<T> {
    pub fn new(conf: Conf, space: SpinorSpace) -> Self {
        let mut timers = Timers::new();
        timers.new_entry("tmplt", "Diagram template constr (tmplt)");
        timers.new_entry("copy", "Diagram copy (copy)");
        Self {
            conf,
            space: Arc::new(space),
            stack: DiagramStack::new(),
            timers,
        }
    }

    pub fn space(&self) -> &Arc<SpinorSpace> {
        &self.space
    }

    pub fn stack(&self) -> &DiagramStack<T> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut DiagramStack<T> {
        &mut self.stack
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn find(&self, name: &str) -> Option<&Diagram<T>> {
        self.stack.find(name)
    }

    pub fn get(&self, name: &str) -> Result<&Diagram<T>> {
        self.stack.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Diagram<T>> {
        self.stack.get_mut(name)
    }

    /// Build a zero-filled diagram of the given operator symmetry and
    /// install it, replacing an existing diagram of the same name in
    /// place.
    pub fn tmplt_sym(
        &mut self,
        name: &str,
        qparts: &str,
        valence: &str,
        order: &str,
        perm_unique: bool,
        irrep: usize,
    ) -> Result<&mut Diagram<T>> {
        self.timers.start("tmplt");
        let result = self.build(name, qparts, valence, order,
                                perm_unique, irrep);
        self.timers.stop("tmplt");
        result?;
        self.stack.get_mut(name)
    }

    fn build(
        &mut self,
        name: &str,
        qparts: &str,
        valence: &str,
        order: &str,
        perm_unique: bool,
        irrep: usize,
    ) -> Result<()> {
        let t3space = diagram::t3_mask(qparts.chars().count(),
                                       self.conf.restrict_triples);
        let d = Diagram::new(self.space.clone(), name, qparts, valence,
                             &t3space, order, perm_unique, irrep)?;
        debug!("tmplt {}", d.summary());
        self.stack.insert_or_replace(d);
        Ok(())
    }

    /// `tmplt_sym` with the totally symmetric irrep.
    pub fn tmplt(
        &mut self,
        name: &str,
        qparts: &str,
        valence: &str,
        order: &str,
        perm_unique: bool,
    ) -> Result<&mut Diagram<T>> {
        let irrep = self.space.group().totally_symmetric_irrep();
        self.tmplt_sym(name, qparts, valence, order, perm_unique, irrep)
    }

    /// Deep copy of `src` under the name `target`.  An existing `target`
    /// is replaced in place.
    pub fn copy(&mut self, src: &str, target: &str) -> Result<()> {
        self.timers.start("copy");
        let result = self.stack.get(src).map(|d| d.clone());
        let result = result.map(|mut d| {
            d.set_name(target);
            debug!("copy {} -> {}", src, target);
            self.stack.insert_or_replace(d);
        });
        self.timers.stop("copy");
        result
    }

    pub fn clear(&mut self, name: &str) -> Result<()> {
        self.stack.get_mut(name)?.clear();
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        self.stack.rename(old, new)
    }

    pub fn erase(&mut self, name: &str) -> Result<()> {
        self.stack.erase(name).map(|_| ())
    }

    pub fn scale(&mut self, name: &str, alpha: T) -> Result<()> {
        self.stack.get_mut(name)?.scale(alpha);
        Ok(())
    }

    /// Largest modulus in a diagram and the spinor indices where it sits.
    pub fn findmax(&self, name: &str) -> Result<(f64, Vec<usize>)> {
        Ok(self.stack.get(name)?.max())
    }

    /// Largest elementwise difference between two diagrams.
    pub fn diffmax(&self, a: &str, b: &str) -> Result<(f64, Vec<usize>)> {
        self.stack.get(a)?.diffmax(self.stack.get(b)?)
    }

    pub fn write_diagram(&self, name: &str, path: &Path) -> Result<()> {
        dgfile::save(path, self.stack.get(name)?)
    }

    /// Load a diagram dumped by `write_diagram` and install it under its
    /// stored name.  Returns that name.
    pub fn read_diagram(&mut self, path: &Path) -> Result<String> {
        let d: Diagram<T> = dgfile::load(path, self.space.clone())?;
        let name = d.name().to_owned();
        self.stack.insert_or_replace(d);
        Ok(name)
    }

    /// Per-irrep square blocks of a rank-2 diagram, rows and columns
    /// running over the spinors its two dimensions select.
    pub fn heff_blocks(&self, name: &str) -> Result<(Vec<usize>, Vec<Vec<T>>)> {
        let d = self.stack.get(name)?;
        if d.rank() != 2 {
            return Err(shape_mismatch(format!(
                "'{}' has rank {}, an effective Hamiltonian needs rank 2",
                name, d.rank())));
        }
        let rows = self.space.select(d.label(0));
        let cols = self.space.select(d.label(1));
        let mut dims = Vec::new();
        let mut blocks = Vec::new();
        for irrep in 0 .. self.space.group().num_irreps() {
            let of_irrep = |lists: &Vec<Vec<usize>>| -> Vec<usize> {
                self.space.blocks().iter().enumerate()
                    .filter(|&(_, b)| b.irrep == irrep)
                    .flat_map(|(i, _)| lists[i].iter().cloned())
                    .collect()
            };
            let r = of_irrep(&rows.lists);
            let c = of_irrep(&cols.lists);
            if r.len() != c.len() {
                return Err(shape_mismatch(format!(
                    "'{}' irrep {} block is {}x{}, not square",
                    name, irrep, r.len(), c.len())));
            }
            let mut block = Vec::with_capacity(r.len() * c.len());
            for &i in &r {
                for &j in &c {
                    block.push(d.get(&[i, j])?);
                }
            }
            dims.push(r.len());
            blocks.push(block);
        }
        Ok((dims, blocks))
    }

    /// Write a rank-2 diagram as the formatted Heff of the given sector.
    pub fn write_heff(
        &self,
        name: &str,
        dir: &Path,
        sect_h: usize,
        sect_p: usize,
        label: Option<&str>,
    ) -> Result<PathBuf> {
        let (dims, blocks) = self.heff_blocks(name)?;
        heff::write_formatted_heff(dir, sect_h, sect_p, label, T::ARITH,
                                   &dims, &blocks)
    }

    /// Position of the stack top, for scoped temporaries.
    pub fn stack_position(&self) -> usize {
        self.stack.position()
    }

    pub fn restore_stack_position(&mut self, pos: usize) {
        self.stack.restore_position(pos)
    }

    pub fn stack_summary(&self) -> String {
        self.stack.to_string()
    }
}
