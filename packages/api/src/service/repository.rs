//! Person data access

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::model::Person;
use crate::error::ServiceError;

/// Storage behind the person endpoint
pub trait PersonRepository: Send + Sync {
    /// Person stored under `id`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the backing store fails.
    fn get(&self, id: &str) -> Result<Option<Person>, ServiceError>;

    /// Insert or replace `person`, assigning an id when it has none
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the backing store fails.
    fn save(&self, person: Person) -> Result<Person, ServiceError>;

    /// Remove and return the person stored under `id`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the backing store fails.
    fn delete(&self, id: &str) -> Result<Option<Person>, ServiceError>;

    /// Replace an existing person; `None` when no person has `person.id`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the backing store fails.
    fn update(&self, person: Person) -> Result<Option<Person>, ServiceError>;
}

/// Concurrent in-memory repository
#[derive(Debug)]
pub struct InMemoryPersonRepository {
    people: DashMap<String, Person>,
    next_id: AtomicU64,
}

impl InMemoryPersonRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            people: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    fn assign_id(&self) -> String {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
            if !self.people.contains_key(&id) {
                return id;
            }
        }
    }
}

impl Default for InMemoryPersonRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonRepository for InMemoryPersonRepository {
    fn get(&self, id: &str) -> Result<Option<Person>, ServiceError> {
        Ok(self.people.get(id).map(|entry| entry.value().clone()))
    }

    fn save(&self, mut person: Person) -> Result<Person, ServiceError> {
        if person.id.trim().is_empty() {
            person.id = self.assign_id();
        }
        self.people.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    fn delete(&self, id: &str) -> Result<Option<Person>, ServiceError> {
        Ok(self.people.remove(id).map(|(_, person)| person))
    }

    fn update(&self, person: Person) -> Result<Option<Person>, ServiceError> {
        match self.people.get_mut(&person.id) {
            Some(mut entry) => {
                *entry = person.clone();
                Ok(Some(person))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Person {
        Person {
            name: "Ada".to_string(),
            age: 36,
            address: "London".to_string(),
            ..Person::default()
        }
    }

    #[test]
    fn save_assigns_ids_and_keeps_given_ones() {
        let repo = InMemoryPersonRepository::new();
        let first = repo.save(ada()).unwrap();
        let second = repo.save(ada()).unwrap();
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);

        let named = repo
            .save(Person {
                id: "ada".to_string(),
                ..ada()
            })
            .unwrap();
        assert_eq!(named.id, "ada");
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn assigned_ids_skip_explicitly_taken_ones() {
        let repo = InMemoryPersonRepository::new();
        repo.save(Person {
            id: "1".to_string(),
            ..ada()
        })
        .unwrap();

        let assigned = repo.save(ada()).unwrap();
        assert_eq!(assigned.id, "2");
    }

    #[test]
    fn update_and_delete_only_touch_existing_people() {
        let repo = InMemoryPersonRepository::new();
        let saved = repo.save(ada()).unwrap();

        let missing = Person {
            id: "404".to_string(),
            ..ada()
        };
        assert!(repo.update(missing).unwrap().is_none());

        let renamed = Person {
            name: "Ada Lovelace".to_string(),
            ..saved.clone()
        };
        assert_eq!(repo.update(renamed.clone()).unwrap(), Some(renamed.clone()));
        assert_eq!(repo.get(&saved.id).unwrap(), Some(renamed));

        assert!(repo.delete(&saved.id).unwrap().is_some());
        assert!(repo.delete(&saved.id).unwrap().is_none());
        assert!(repo.is_empty());
    }
}
