// Copyright 2026 Varsift Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compiled filters
//!
//! [`Filter`] is the public entry point: compile an expression against a
//! header once, then test records against it. A filter owns per-node
//! scratch buffers, so one instance must not evaluate records concurrently;
//! clone-by-recompile per worker, or serialise access.

use std::fmt;
use std::io;

use log::{debug, trace};

use crate::core::error::Result;
use crate::core::record::Record;
use crate::core::schema::Header;
use crate::core::value::ValueSlot;
use crate::parser::parser::{compile, Program};

/// A compiled filter expression
///
/// # Example
///
/// ```
/// use varsift::core::{Arity, HeaderBuilder, RecordBuilder, ValueType};
/// use varsift::Filter;
///
/// let header = HeaderBuilder::new()
///     .info("DP", ValueType::Int, Arity::Count(1))
///     .build();
/// let mut filter = Filter::new(&header, "INFO/DP>10").unwrap();
///
/// let record = RecordBuilder::new(&header).info_int("DP", vec![14]).build().unwrap();
/// let (site_pass, _) = filter.test(&record).unwrap();
/// assert!(site_pass);
/// ```
pub struct Filter {
    expr: String,
    program: Program,
    slots: Vec<ValueSlot>,
}

impl Filter {
    /// Compile `expr` against `header`
    pub fn new(header: &dyn Header, expr: &str) -> Result<Filter> {
        let program = compile(header, expr)?;
        debug!(
            "compiled filter \"{}\" ({} nodes, unpack mask {:#x}):\n{}",
            expr,
            program.nodes.len(),
            program.max_unpack,
            program
        );
        let slots = program
            .nodes
            .iter()
            .map(|_| ValueSlot::with_samples(program.nsamples))
            .collect();
        Ok(Filter {
            expr: expr.to_string(),
            program,
            slots,
        })
    }

    /// Evaluate one record
    ///
    /// Returns the site verdict and, when the expression touches FORMAT
    /// fields, the per-sample pass mask. When the final value carries no
    /// sample vector the site verdict is fanned out across all samples.
    pub fn test(&mut self, record: &dyn Record) -> Result<(bool, Option<&[bool]>)> {
        record.unpack(self.program.max_unpack);
        let top = crate::eval::machine::run(&self.program.nodes, &mut self.slots, &self.expr, record)?;

        let nsamples = self.program.nsamples;
        let site = self.slots[top].pass_site.as_bool();
        trace!("\"{}\" -> site={}", self.expr, site);
        if nsamples == 0 {
            return Ok((site, None));
        }
        let slot = &mut self.slots[top];
        slot.resize_mask(nsamples);
        if slot.nsamples == 0 {
            for flag in slot.pass_samples[..nsamples].iter_mut() {
                *flag = site;
            }
        }
        Ok((site, Some(&self.slots[top].pass_samples[..nsamples])))
    }

    /// The expression this filter was compiled from
    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// Record columns evaluation reads (see [`crate::core::types::unpack`])
    ///
    /// Callers can skip decoding everything else.
    pub fn max_unpack(&self) -> u8 {
        self.program.max_unpack
    }

    /// Sample count the filter was compiled for; 0 when the expression
    /// never touches FORMAT fields
    pub fn nsamples(&self) -> usize {
        self.program.nsamples
    }
}

impl fmt::Display for Filter {
    /// The compiled program in postfix order, one node per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("expr", &self.expr)
            .field("nodes", &self.program.nodes.len())
            .field("nsamples", &self.program.nsamples)
            .finish()
    }
}

/// Write the expression grammar summary
pub fn write_expression_help<W: io::Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Filter expressions may contain:")?;
    writeln!(out, "    - numerical constants and string constants")?;
    writeln!(out, "        .. 1, 1.0, 1e-4")?;
    writeln!(out, "        .. \"String\"")?;
    writeln!(out, "    - arithmetic operators: +,*,-,/")?;
    writeln!(
        out,
        "    - comparison operators: == (same as =), >, >=, <=, <, !="
    )?;
    writeln!(out, "    - parentheses: (, )")?;
    writeln!(out, "    - logical operators: &&, &, ||, |")?;
    writeln!(out, "    - INFO tags, FORMAT tags, column names")?;
    writeln!(out, "        .. INFO/DP or DP")?;
    writeln!(out, "        .. FORMAT/DV, FMT/DV, or DV")?;
    writeln!(out, "        .. %FILTER, %QUAL")?;
    writeln!(
        out,
        "    - 1 (or 0) to test the presence (or absence) of a flag"
    )?;
    writeln!(out, "        .. FlagA=1 && FlagB=0")?;
    writeln!(
        out,
        "    - %TYPE for variant type in REF,ALT columns: indel,snp,mnp,ref,other"
    )?;
    writeln!(out, "        .. %TYPE=\"indel\" | %TYPE=\"snp\"")?;
    writeln!(out, "    - array subscripts")?;
    writeln!(out, "        .. (DP4[0]+DP4[1])/(DP4[2]+DP4[3]) > 0.3")?;
    writeln!(out, "    - operations on FORMAT fields: MAX, MIN, AVG")?;
    writeln!(out, "        .. %MIN(DV)>5")?;
    writeln!(out, "        .. %MIN(DV/DP)>0.3")?;
    writeln!(out, "        .. %MIN(DP)>10 & %MIN(DV)>3")?;
    writeln!(
        out,
        "        .. %QUAL>10 |  FMT/GQ>10   .. selects only GQ>10 samples"
    )?;
    writeln!(
        out,
        "        .. %QUAL>10 || FMT/GQ>10   .. selects all samples at QUAL>10 sites"
    )?;
    Ok(())
}
