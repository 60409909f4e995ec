//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

#[derive(Debug, Default)]
struct Queue {
    interactions: Vec<Interaction>,
    cursor: usize,
}

/// Serves a cassette's interactions back in order, one queue per
/// port/method pair, so unrelated calls may interleave freely.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Queue>,
}

impl CassetteReplayer {
    /// Indexes a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Queue> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues
                .entry(key)
                .or_default()
                .interactions
                .push(interaction.clone());
        }
        Self { queues }
    }

    /// Returns the next interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette holds no (more) interactions for the pair,
    /// listing what it does hold.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = PortMethodKey {
            port: port.to_string(),
            method: method.to_string(),
        };

        if !self.queues.contains_key(&key) {
            let mut available: Vec<String> = self
                .queues
                .keys()
                .map(|k| format!("{}::{}", k.port, k.method))
                .collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        }
        let queue = self.queues.entry(key).or_default();
        assert!(
            queue.cursor < queue.interactions.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = queue.interactions.len(),
            last_seq = queue.interactions.last().map_or(0, |i| i.seq),
        );

        let interaction = &queue.interactions[queue.cursor];
        queue.cursor += 1;
        interaction
    }

    /// Interactions not yet served, across all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues
            .values()
            .map(|q| q.interactions.len() - q.cursor)
            .sum()
    }
}
