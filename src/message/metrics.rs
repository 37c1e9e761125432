//! Positional decoding of the `;`-separated metrics blob produced by the
//! Zabbix item. Fields are addressed by index only; there is no quoting, so a
//! `;` inside a process name shifts every following column.

const CPU_PERCENT: usize = 1;
const TOP_CPU_START: usize = 2;
const MEMORY_PERCENT: usize = 12;
const TOP_MEMORY_START: usize = 13;
const CONNECTIONS: usize = 23;
const REQUESTS_PER_SEC: usize = 24;

/// Number of processes in each top list.
pub const TOP_PROCESSES: usize = 5;

/// One `name = usage%` line of a top-processes list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessUsage {
    /// 1-based position in its list.
    pub rank: usize,
    pub name: String,
    pub usage: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsRecord {
    values: Vec<String>,
}

impl MetricsRecord {
    pub fn decode(csv: &str) -> Self {
        Self {
            values: csv.split(';').map(str::to_string).collect(),
        }
    }

    /// Number of `;`-separated columns, including empty ones.
    pub fn field_count(&self) -> usize {
        self.values.len()
    }

    fn field(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Missing columns render as an empty string.
    pub fn cpu_percent(&self) -> &str {
        self.field(CPU_PERCENT).unwrap_or_default()
    }

    pub fn memory_percent(&self) -> &str {
        self.field(MEMORY_PERCENT).unwrap_or_default()
    }

    /// Pairs from columns 2..=11. A pair is kept whenever both columns exist,
    /// even if they are empty.
    pub fn top_cpu(&self) -> Vec<ProcessUsage> {
        self.pairs(TOP_CPU_START, |_, _| true)
    }

    /// Pairs from columns 13..=22. Pairs with an empty name or usage are
    /// dropped; an empty result means "no data".
    pub fn top_memory(&self) -> Vec<ProcessUsage> {
        self.pairs(TOP_MEMORY_START, |name, usage| {
            !name.is_empty() && !usage.is_empty()
        })
    }

    pub fn connections(&self) -> &str {
        self.field_or_zero(CONNECTIONS)
    }

    pub fn requests_per_sec(&self) -> &str {
        self.field_or_zero(REQUESTS_PER_SEC)
    }

    fn field_or_zero(&self, index: usize) -> &str {
        match self.field(index) {
            Some(value) if !value.is_empty() => value,
            _ => "0",
        }
    }

    fn pairs<F>(&self, start: usize, keep: F) -> Vec<ProcessUsage>
    where
        F: Fn(&str, &str) -> bool,
    {
        (0..TOP_PROCESSES)
            .filter_map(|slot| {
                let name = self.field(start + slot * 2)?;
                let usage = self.field(start + slot * 2 + 1)?;
                keep(name, usage).then(|| ProcessUsage {
                    rank: slot + 1,
                    name: name.to_string(),
                    usage: usage.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_blob() -> String {
        let mut values: Vec<String> = (0..25).map(|i| format!("v{}", i)).collect();
        values[1] = "55".to_string();
        values[12] = "70".to_string();
        values[23] = "120".to_string();
        values[24] = "33.5".to_string();
        values.join(";")
    }

    #[test]
    fn test_decode_full_record() {
        let record = MetricsRecord::decode(&full_blob());

        assert_eq!(record.field_count(), 25);
        assert_eq!(record.cpu_percent(), "55");
        assert_eq!(record.memory_percent(), "70");
        assert_eq!(record.connections(), "120");
        assert_eq!(record.requests_per_sec(), "33.5");

        let cpu = record.top_cpu();
        assert_eq!(cpu.len(), 5);
        assert_eq!(
            cpu[0],
            ProcessUsage { rank: 1, name: "v2".to_string(), usage: "v3".to_string() }
        );
        assert_eq!(cpu[4].name, "v10");
        assert_eq!(cpu[4].usage, "v11");

        let memory = record.top_memory();
        assert_eq!(memory.len(), 5);
        assert_eq!(memory[0].name, "v13");
        assert_eq!(memory[4].name, "v21");
        assert_eq!(memory[4].usage, "v22");
    }

    #[test]
    fn test_short_record_never_panics() {
        for len in 0..25 {
            let blob = vec!["x"; len].join(";");
            let record = MetricsRecord::decode(&blob);
            let _ = record.cpu_percent();
            let _ = record.memory_percent();
            let _ = record.top_cpu();
            let _ = record.top_memory();
            // "".split(';') still yields one field
            assert_eq!(record.field_count(), len.max(1));
            if len <= 23 {
                assert_eq!(record.connections(), "0");
            } else {
                assert_eq!(record.connections(), "x");
            }
            assert_eq!(record.requests_per_sec(), "0");
        }
    }

    #[test]
    fn test_missing_percentages_are_empty() {
        let record = MetricsRecord::decode("host");
        assert_eq!(record.cpu_percent(), "");
        assert_eq!(record.memory_percent(), "");
    }

    #[test]
    fn test_cpu_pairs_stop_at_bounds() {
        // columns 0..=6: two complete pairs and a dangling name
        let record = MetricsRecord::decode("h;10;a;1;b;2;c");
        let cpu = record.top_cpu();
        assert_eq!(cpu.len(), 2);
        assert_eq!(cpu[1].rank, 2);
        assert_eq!(cpu[1].name, "b");
    }

    #[test]
    fn test_cpu_pairs_keep_empty_values() {
        let record = MetricsRecord::decode("h;10;;;b;2");
        let cpu = record.top_cpu();
        assert_eq!(cpu.len(), 2);
        assert_eq!(cpu[0].name, "");
        assert_eq!(cpu[0].usage, "");
    }

    #[test]
    fn test_memory_pairs_skip_empty_values() {
        let mut values = vec![""; 25];
        values[15] = "mysqld";
        values[16] = "12.5";
        values[17] = "orphan";
        let record = MetricsRecord::decode(&values.join(";"));

        let memory = record.top_memory();
        assert_eq!(memory.len(), 1);
        assert_eq!(memory[0].rank, 2);
        assert_eq!(memory[0].name, "mysqld");
    }

    #[test]
    fn test_empty_counters_default_to_zero() {
        let values = vec![""; 25];
        let record = MetricsRecord::decode(&values.join(";"));
        assert_eq!(record.connections(), "0");
        assert_eq!(record.requests_per_sec(), "0");
    }
}
