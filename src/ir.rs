use std::collections::BTreeMap;

/// Automaton description handed over by the parser (or an embedding caller).
#[derive(Debug, Clone, Default)]
pub struct MachineSpec {
    pub states: Vec<String>,
    pub initial: String,
    pub accepting: Vec<String>,
    /// Flat transition records: first field = source, last = destination,
    /// everything between = symbols sharing that pair.
    pub transitions: Vec<Vec<String>>,
}

impl MachineSpec {
    pub fn is_accepting(&self, id: &str) -> bool {
        self.accepting.iter().any(|s| s == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionDegree {
    None,
    OneWay,
    Mutual,
}

/// Normalized transition relation: source -> symbol -> destinations.
///
/// A record `[src, s1..sk, dst]` fans out into k entries keyed by each
/// symbol; a record with no symbol fields lands under the empty key.
/// Destinations are kept in insertion order and deduplicated, so
/// re-declaring a (source, destination) pair with new symbols appends
/// rather than overwrites.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    entries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl TransitionTable {
    pub fn build(records: &[Vec<String>]) -> Self {
        let mut table = Self::default();
        for record in records {
            table.add_record(record);
        }
        table
    }

    /// Best-effort: short records degenerate (a 2-field record has an empty
    /// symbol set, a 1-field record is a bare self-reference), never an error.
    pub fn add_record(&mut self, record: &[String]) {
        let Some(source) = record.first() else {
            return;
        };
        let Some(destination) = record.last() else {
            return;
        };
        if record.len() <= 2 {
            self.insert(source, "", destination);
            return;
        }
        for symbol in &record[1..record.len() - 1] {
            self.insert(source, symbol, destination);
        }
    }

    pub fn insert(&mut self, source: &str, symbol: &str, destination: &str) {
        let destinations = self
            .entries
            .entry(source.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default();
        if !destinations.iter().any(|d| d == destination) {
            destinations.push(destination.to_string());
        }
    }

    /// Sorted, deduplicated symbols labeling any transition from `a` to `b`.
    /// Empty means no such transition; unknown states simply miss.
    pub fn symbols_between(&self, a: &str, b: &str) -> Vec<&str> {
        let Some(by_symbol) = self.entries.get(a) else {
            return Vec::new();
        };
        // BTreeMap iteration already yields symbols in sorted order.
        by_symbol
            .iter()
            .filter(|(_, dests)| dests.iter().any(|d| d == b))
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }

    pub fn connection_degree(&self, a: &str, b: &str) -> ConnectionDegree {
        let forward = !self.symbols_between(a, b).is_empty();
        let backward = !self.symbols_between(b, a).is_empty();
        match (forward, backward) {
            (true, true) => ConnectionDegree::Mutual,
            (false, false) => ConnectionDegree::None,
            _ => ConnectionDegree::OneWay,
        }
    }

    pub fn has_self_loop(&self, a: &str) -> bool {
        !self.symbols_between(a, a).is_empty()
    }

    /// Every (source, symbol, destination) triple, one per fanned-out entry.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries.iter().flat_map(|(source, by_symbol)| {
            by_symbol.iter().flat_map(move |(symbol, dests)| {
                dests
                    .iter()
                    .map(move |dest| (source.as_str(), symbol.as_str(), dest.as_str()))
            })
        })
    }
}
