use std::collections::VecDeque;

#[derive(Debug)]
pub enum CacheOperation {
    Put(u8, u8),
    Get(u8),
    Peek(u8),
    Has(u8),
    Delete(u8),
    PopLru,
    Clear,
    GetOrInsertWith(u8, u8),
    Retain,
    Entries,
}

impl<'a> arbitrary::Arbitrary<'a> for CacheOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=9)? {
            0 => Ok(CacheOperation::Put(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(CacheOperation::Get(u.arbitrary()?)),
            2 => Ok(CacheOperation::Peek(u.arbitrary()?)),
            3 => Ok(CacheOperation::Has(u.arbitrary()?)),
            4 => Ok(CacheOperation::Delete(u.arbitrary()?)),
            5 => Ok(CacheOperation::PopLru),
            6 => Ok(CacheOperation::Clear),
            7 => Ok(CacheOperation::GetOrInsertWith(
                u.arbitrary()?,
                u.arbitrary()?,
            )),
            8 => Ok(CacheOperation::Retain),
            9 => Ok(CacheOperation::Entries),
            _ => unreachable!(),
        }
    }
}

/// Linear-time reference cache, most recently used first.
#[derive(Debug)]
pub struct Model {
    capacity: usize,
    entries: VecDeque<(u8, u8)>,
}

impl Model {
    pub fn new(capacity: usize) -> Self {
        Model {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn entries(&self) -> Vec<(u8, u8)> {
        self.entries.iter().copied().collect()
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    pub fn has(&self, key: u8) -> bool {
        self.position(key).is_some()
    }

    pub fn peek(&self, key: u8) -> Option<u8> {
        self.position(key).map(|index| self.entries[index].1)
    }

    pub fn get(&mut self, key: u8) -> Option<u8> {
        let entry = self.entries.remove(self.position(key)?)?;
        self.entries.push_front(entry);
        Some(entry.1)
    }

    pub fn put(&mut self, key: u8, value: u8) -> Option<(u8, u8)> {
        if let Some(index) = self.position(key) {
            self.entries.remove(index);
            self.entries.push_front((key, value));
            return None;
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front((key, value));
        evicted
    }

    pub fn get_or_insert_with(&mut self, key: u8, value: u8) -> u8 {
        match self.get(key) {
            Some(existing) => existing,
            None => {
                self.put(key, value);
                value
            }
        }
    }

    pub fn delete(&mut self, key: u8) -> bool {
        match self.position(key) {
            Some(index) => self.entries.remove(index).is_some(),
            None => false,
        }
    }

    pub fn pop_lru(&mut self) -> Option<(u8, u8)> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn retain(&mut self, keep: impl Fn(u8, u8) -> bool) {
        self.entries.retain(|(k, v)| keep(*k, *v));
    }
}
