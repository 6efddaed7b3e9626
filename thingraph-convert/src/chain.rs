//! Ordered converter list with first-success dispatch

use tracing::{debug, trace};

use crate::converter::{ConversionContext, ResourceConverter};
use crate::error::{ConversionError, Result};
use crate::resource::{describe, ReadableResource, WritableResource};

pub const DEFAULT_MAX_DEPTH: usize = 8;

pub struct ResourceConverterChain {
    converters: Vec<Box<dyn ResourceConverter>>,
    max_depth: usize,
}

impl ResourceConverterChain {
    pub fn new(converters: Vec<Box<dyn ResourceConverter>>) -> Self {
        Self {
            converters,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.converters.iter().map(|c| c.name())
    }

    /// Try each converter in order until one reports success
    ///
    /// `Ok(false)` when all declined. Errors from a converter stop the chain.
    pub fn convert_into(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<bool> {
        let pair = (ctx.essence(from.media_type()), ctx.essence(into.media_type()));
        if ctx.depth() >= self.max_depth || ctx.is_visiting(&pair) {
            return Err(ConversionError::RecursionLimit {
                from: describe(from),
                into: describe(into),
                depth: ctx.depth(),
            });
        }
        let nested = ctx.enter(pair);

        for converter in &self.converters {
            if converter.convert_into(from, into, &nested)? {
                debug!(
                    converter = converter.name(),
                    from = from.iri(),
                    into = into.iri(),
                    depth = ctx.depth(),
                    "converted"
                );
                return Ok(true);
            }
            trace!(
                converter = converter.name(),
                from = %from.media_type(),
                into = %into.media_type(),
                "converter declined"
            );
        }
        Ok(false)
    }

    /// Like [`Self::convert_into`], but all converters declining is an error
    pub fn convert(
        &self,
        from: &dyn ReadableResource,
        into: &dyn WritableResource,
        ctx: &ConversionContext<'_>,
    ) -> Result<()> {
        if self.convert_into(from, into, ctx)? {
            Ok(())
        } else {
            Err(ConversionError::NoConverter {
                from: describe(from),
                into: describe(into),
            })
        }
    }
}
