//! Per-call variable storage.
//!
//! A frame holds both the scalars and the arrays of one function call.
//! Scalars exist once assigned; arrays come into being zero-filled to their
//! declared length the first time they are touched.

use rustc_hash::FxHashMap;

use calc_ir::VarId;

use crate::errors::{out_of_memory, EvalResult};

/// Variables of one in-flight call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    scalars: FxHashMap<VarId, f64>,
    arrays: FxHashMap<VarId, Vec<f64>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a scalar, `None` if never assigned in this frame.
    #[inline]
    pub fn scalar(&self, var: VarId) -> Option<f64> {
        self.scalars.get(&var).copied()
    }

    pub fn set_scalar(&mut self, var: VarId, value: f64) -> EvalResult<()> {
        if !self.scalars.contains_key(&var) {
            self.scalars
                .try_reserve(1)
                .map_err(|_| out_of_memory("frame"))?;
        }
        self.scalars.insert(var, value);
        Ok(())
    }

    /// Mutable view of an array, zero-filling it to `len` on first access.
    pub fn array_mut(&mut self, var: VarId, len: usize) -> EvalResult<&mut [f64]> {
        if !self.arrays.contains_key(&var) {
            let zeros = zeroed(len)?;
            self.insert_array(var, zeros)?;
        }
        match self.arrays.get_mut(&var) {
            Some(values) => Ok(values.as_mut_slice()),
            None => Err(out_of_memory("frame")),
        }
    }

    /// Copy of an array's contents. An untouched array reads as zeros.
    pub fn array_snapshot(&self, var: VarId, len: usize) -> EvalResult<Vec<f64>> {
        match self.arrays.get(&var) {
            Some(values) => {
                let mut copy = Vec::new();
                copy.try_reserve_exact(values.len())
                    .map_err(|_| out_of_memory("array copy"))?;
                copy.extend_from_slice(values);
                Ok(copy)
            }
            None => zeroed(len),
        }
    }

    /// Install an array wholesale (array parameters).
    pub fn insert_array(&mut self, var: VarId, values: Vec<f64>) -> EvalResult<()> {
        if !self.arrays.contains_key(&var) {
            self.arrays
                .try_reserve(1)
                .map_err(|_| out_of_memory("frame"))?;
        }
        self.arrays.insert(var, values);
        Ok(())
    }

    /// Assigned scalars, in no particular order.
    pub fn scalars(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.scalars.iter().map(|(&var, &value)| (var, value))
    }
}

fn zeroed(len: usize) -> EvalResult<Vec<f64>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| out_of_memory("array"))?;
    values.resize(len, 0.0);
    Ok(values)
}
