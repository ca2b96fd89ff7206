//! Lazy SMP: one main thread plus helpers sharing the transposition table

mod lazy_smp;

pub(crate) use lazy_smp::{SearchJob, run};
