//! Signal Table Model - editable name/value records
//!
//! A fixed-size collection of named numeric signals, mutated in place
//! by the GUI widgets each frame. No persistence, no device I/O; the
//! table is the only application state that crosses frame boundaries.

/// Maximum signal name length in bytes
pub const MAX_NAME_LEN: usize = 64;

/// Number of signal records in the table
pub const NUM_SIGNALS: usize = 5;

/// Inclusive upper bound for signal values (16-bit register range)
pub const MAX_SIGNAL_VALUE: i64 = u16::MAX as i64;

/// A single named signal with a 16-bit register value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRecord {
    /// Signal name, at most [`MAX_NAME_LEN`] bytes
    pub name: String,
    /// Register value in [0, 65535]
    pub value: u16,
}

impl SignalRecord {
    pub fn new(name: &str, value: u16) -> Self {
        let mut record = Self {
            name: String::new(),
            value,
        };
        record.set_name(name);
        record
    }

    /// Replace the name, truncating to [`MAX_NAME_LEN`] bytes.
    ///
    /// Truncation backs off to a char boundary so the stored string
    /// is always valid UTF-8.
    pub fn set_name(&mut self, name: &str) {
        if name.len() <= MAX_NAME_LEN {
            self.name = name.to_string();
            return;
        }

        let mut end = MAX_NAME_LEN;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        self.name = name[..end].to_string();
    }

    /// Replace the value, clamping into [0, 65535].
    pub fn set_value(&mut self, value: i64) {
        self.value = value.clamp(0, MAX_SIGNAL_VALUE) as u16;
    }
}

/// The fixed table of [`NUM_SIGNALS`] records
///
/// Records have stable identity by index; none are created or
/// deleted after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalTable {
    records: [SignalRecord; NUM_SIGNALS],
}

impl Default for SignalTable {
    fn default() -> Self {
        Self {
            records: [
                SignalRecord::new("Temperature", 25),
                SignalRecord::new("Pressure", 1013),
                SignalRecord::new("Flow Rate", 50),
                SignalRecord::new("Level", 75),
                SignalRecord::new("Status Word", 1),
            ],
        }
    }
}

impl SignalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        NUM_SIGNALS
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&SignalRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SignalRecord> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SignalRecord> {
        self.records.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = SignalTable::default();

        assert_eq!(table.len(), NUM_SIGNALS);
        assert_eq!(table.get(0).unwrap().name, "Temperature");
        assert_eq!(table.get(0).unwrap().value, 25);
        assert_eq!(table.get(1).unwrap().name, "Pressure");
        assert_eq!(table.get(1).unwrap().value, 1013);
        assert_eq!(table.get(2).unwrap().name, "Flow Rate");
        assert_eq!(table.get(3).unwrap().name, "Level");
        assert_eq!(table.get(4).unwrap().name, "Status Word");
        assert_eq!(table.get(4).unwrap().value, 1);
        assert!(table.get(NUM_SIGNALS).is_none());
    }

    #[test]
    fn test_value_clamps_high() {
        let mut record = SignalRecord::new("Level", 0);
        record.set_value(70_000);
        assert_eq!(record.value, 65_535);
    }

    #[test]
    fn test_value_clamps_low() {
        let mut record = SignalRecord::new("Level", 10);
        record.set_value(-5);
        assert_eq!(record.value, 0);
    }

    #[test]
    fn test_value_in_range_kept() {
        let mut record = SignalRecord::new("Level", 0);
        record.set_value(1013);
        assert_eq!(record.value, 1013);
    }

    #[test]
    fn test_name_truncated_to_max() {
        let mut record = SignalRecord::new("x", 0);
        record.set_name(&"a".repeat(200));
        assert_eq!(record.name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_name_truncation_respects_char_boundary() {
        let mut record = SignalRecord::new("x", 0);
        // 2-byte chars; 64 is an even boundary so back off lands on 64,
        // use 63-byte prefix + multibyte char to force the back-off.
        let name = format!("{}й{}", "a".repeat(63), "b".repeat(10));
        record.set_name(&name);
        assert!(record.name.len() <= MAX_NAME_LEN);
        assert!(record.name.is_char_boundary(record.name.len()));
        assert_eq!(record.name, "a".repeat(63));
    }

    #[test]
    fn test_edits_are_in_place() {
        let mut table = SignalTable::default();
        table.get_mut(2).unwrap().set_value(9999);
        table.get_mut(2).unwrap().set_name("Flow");

        assert_eq!(table.get(2).unwrap().value, 9999);
        assert_eq!(table.get(2).unwrap().name, "Flow");
        // Neighbors untouched, identity by index is stable
        assert_eq!(table.get(1).unwrap().name, "Pressure");
        assert_eq!(table.get(3).unwrap().name, "Level");
    }
}
