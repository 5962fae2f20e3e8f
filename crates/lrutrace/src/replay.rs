//! Trace replay against a shared LRU cache

use anyhow::{Context, Result};
use lrucache::SharedLruCache;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::command::{parse_line, Command};

/// Drives a [`SharedLruCache`] from trace commands and reports its stats
pub struct Replayer {
    cache: SharedLruCache<String, String>,
}

impl Replayer {
    /// Create a replayer over a cache of `capacity` entries
    pub fn new(capacity: usize) -> lrucache::Result<Self> {
        Ok(Self {
            cache: SharedLruCache::new(capacity)?,
        })
    }

    /// Run every command in `input`, writing `get` results to `out`.
    /// Returns the number of commands executed.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<usize> {
        let mut executed = 0;

        for (idx, line) in input.lines().enumerate() {
            let lineno = idx + 1;
            let line = line.with_context(|| format!("failed to read line {}", lineno))?;
            let command = parse_line(&line).with_context(|| format!("line {}", lineno))?;

            match command {
                Some(Command::Put { key, value }) => {
                    debug!(%key, "put");
                    self.cache.put(key, value);
                }
                Some(Command::Get { key }) => {
                    match self.cache.get(key.as_str()) {
                        Some(value) => writeln!(out, "{}", value)?,
                        None => writeln!(out, "(nil)")?,
                    }
                }
                None => continue,
            }
            executed += 1;
        }

        Ok(executed)
    }

    /// Write a hit/miss summary
    pub fn write_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let stats = self.cache.stats().snapshot();

        writeln!(out, "# Stats")?;
        writeln!(out, "capacity:  {}", self.cache.capacity())?;
        writeln!(out, "size:      {}", self.cache.len())?;
        writeln!(out, "hits:      {}", stats.hits)?;
        writeln!(out, "misses:    {}", stats.misses)?;
        writeln!(out, "inserts:   {}", stats.inserts)?;
        writeln!(out, "updates:   {}", stats.updates)?;
        writeln!(out, "evictions: {}", stats.evictions)?;
        writeln!(out, "hit_ratio: {:.2}", stats.hit_ratio())?;
        Ok(())
    }
}
