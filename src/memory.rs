//! Variable store: a growable table of named cells.
//!
//! A name receives a slot the first time it is written and keeps that
//! address for the lifetime of the store, so callers may cache addresses
//! across statements. Slots past `len()` exist (capacity doubles from 4)
//! but hold no name and are never matched by lookups.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

mod value;

pub use value::Value;

const INITIAL_CAPACITY: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("name '{name}' has never been written")]
    NotFound { name: String },
    #[error("address {address} out of range (len {len})")]
    OutOfRange { address: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub identifier: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    cells: Vec<Cell>,
    len: usize,
    addresses: FxHashMap<String, usize>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::default(); INITIAL_CAPACITY],
            len: 0,
            addresses: FxHashMap::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The written cells, in address order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.len]
    }

    pub fn address_of(&self, name: &str) -> Option<usize> {
        self.addresses.get(name).copied()
    }

    pub fn read(&self, address: usize) -> Result<Value, MemoryError> {
        self.cells()
            .get(address)
            .map(|cell| cell.value.clone())
            .ok_or(MemoryError::OutOfRange {
                address,
                len: self.len,
            })
    }

    pub fn read_by_name(&self, name: &str) -> Result<Value, MemoryError> {
        let address = self.address_of(name).ok_or_else(|| MemoryError::NotFound {
            name: name.to_string(),
        })?;
        self.read(address)
    }

    pub fn write(&mut self, address: usize, value: Value) -> Result<(), MemoryError> {
        let len = self.len;
        let cell = self.cells[..len]
            .get_mut(address)
            .ok_or(MemoryError::OutOfRange { address, len })?;
        cell.value = value;
        Ok(())
    }

    /// Overwrites `name` in place, or appends a new cell for it. Returns the
    /// cell's address, which never changes afterwards.
    pub fn write_by_name(&mut self, name: &str, value: Value) -> usize {
        if let Some(address) = self.address_of(name) {
            self.cells[address].value = value;
            return address;
        }

        if self.len == self.capacity() {
            let capacity = self.capacity() * 2;
            trace!(from = self.capacity(), to = capacity, "growing memory");
            self.cells.resize_with(capacity, Cell::default);
        }
        let address = self.len;
        self.cells[address] = Cell {
            identifier: name.to_string(),
            value,
        };
        self.addresses.insert(name.to_string(), address);
        self.len += 1;
        address
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Dump of every slot, free ones included.
impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**MEMORY PRINT**")?;
        writeln!(f, "Capacity: {}", self.capacity())?;
        writeln!(f, "Num values: {}", self.len)?;
        writeln!(f, "Contents:")?;
        for (address, cell) in self.cells.iter().enumerate() {
            let identifier = if address < self.len {
                cell.identifier.as_str()
            } else {
                "(null)"
            };
            writeln!(f, " {address}: {identifier}, {}", cell.value)?;
        }
        write!(f, "**END PRINT**")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_one_int() {
        let mut memory = Memory::new();
        assert_eq!(memory.len(), 0);
        assert_eq!(memory.capacity(), 4);

        let address = memory.write_by_name("x", Value::Int(123));
        assert_eq!(address, 0);
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.cells()[0].identifier, "x");
        assert_eq!(memory.read_by_name("x"), Ok(Value::Int(123)));
    }

    #[test]
    fn grows_by_doubling() {
        let mut memory = Memory::new();
        let mut capacities = Vec::new();
        for index in 0..9 {
            memory.write_by_name(&format!("v{index}"), Value::Int(index));
            capacities.push(memory.capacity());
        }
        assert_eq!(capacities, vec![4, 4, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(memory.len(), 9);
        assert_eq!(memory.read_by_name("v8"), Ok(Value::Int(8)));
    }

    #[test]
    fn overwrite_keeps_count_and_address() {
        let mut memory = Memory::new();
        memory.write_by_name("a", Value::Int(12));
        memory.write_by_name("b", Value::Real(-3.8));
        memory.write_by_name("f", Value::from("hello"));
        assert_eq!(memory.len(), 3);

        let address = memory.write_by_name("f", Value::Int(12));
        assert_eq!(address, 2);
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.read(2), Ok(Value::Int(12)));

        memory.write_by_name("f", Value::Boolean(true));
        assert_eq!(memory.read_by_name("f"), Ok(Value::Boolean(true)));
    }

    #[test]
    fn addresses_are_stable_across_growth() {
        let mut memory = Memory::new();
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
        let mut first_seen = Vec::new();
        for name in names {
            first_seen.push(memory.write_by_name(name, Value::from(name)));
        }
        for (round, name) in names.iter().rev().enumerate() {
            memory.write_by_name(name, Value::Int(round as i64));
        }
        for (name, address) in names.iter().zip(first_seen) {
            assert_eq!(memory.address_of(name), Some(address));
        }
    }

    #[test]
    fn unknown_names_and_addresses_fail() {
        let mut memory = Memory::new();
        memory.write_by_name("x", Value::None);

        assert_eq!(memory.address_of("y"), None);
        assert_eq!(
            memory.read_by_name("y"),
            Err(MemoryError::NotFound {
                name: "y".to_string()
            })
        );
        // Slot 1 exists in capacity but has never been written.
        assert_eq!(
            memory.read(1),
            Err(MemoryError::OutOfRange { address: 1, len: 1 })
        );
        assert_eq!(
            memory.write(3, Value::Int(1)),
            Err(MemoryError::OutOfRange { address: 3, len: 1 })
        );
        assert_eq!(memory.address_of(""), None);
    }

    #[test]
    fn write_by_address_overwrites_in_place() {
        let mut memory = Memory::new();
        memory.write_by_name("x", Value::from("old"));
        memory.write_by_name("y", Value::Int(1));

        memory.write(0, Value::Real(2.5)).expect("write");
        assert_eq!(memory.read_by_name("x"), Ok(Value::Real(2.5)));
        assert_eq!(memory.address_of("x"), Some(0));
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn stored_strings_are_isolated_copies() {
        let mut memory = Memory::new();
        let mut text = String::from("abc");
        memory.write_by_name("s", Value::Str(text.clone()));
        text.push('d');
        assert_eq!(memory.read_by_name("s"), Ok(Value::from("abc")));

        let Ok(Value::Str(mut copy)) = memory.read_by_name("s") else {
            panic!("expected string");
        };
        copy.push_str("zzz");
        assert_eq!(memory.read_by_name("s"), Ok(Value::from("abc")));
    }

    #[test]
    fn dumps_every_slot() {
        let mut memory = Memory::new();
        memory.write_by_name("x", Value::Int(3));
        memory.write_by_name("s", Value::from("hi"));
        memory.write_by_name("b", Value::Boolean(false));

        let expected = "**MEMORY PRINT**\n\
                        Capacity: 4\n\
                        Num values: 3\n\
                        Contents:\n \
                        0: x, int, 3\n \
                        1: s, str, 'hi'\n \
                        2: b, boolean, False\n \
                        3: (null), none, None\n\
                        **END PRINT**";
        assert_eq!(memory.to_string(), expected);
    }
}
