use pubhub_error::{HubError, HubResult};
use serde::{Deserialize, Serialize};

use super::AccountState;
use crate::identity::Pubkey;

/// Реестр топиков владельца: упорядоченный список имён без дубликатов с
/// фиксированной ёмкостью.
///
/// # Инварианты
/// - порядок вставки сохраняется для всех оставшихся топиков;
/// - `len() <= capacity()`;
/// - удаление сдвигает все последующие элементы на одну позицию влево.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsAccount {
    owner: Pubkey,
    capacity: u16,
    topics: Vec<String>,
}

impl AccountState for TopicsAccount {
    const NAME: &'static str = "TopicsAccount";
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl TopicsAccount {
    /// Создаёт пустой реестр.
    pub fn new(
        owner: Pubkey,
        capacity: u16,
    ) -> Self {
        Self {
            owner,
            capacity,
            topics: Vec::new(),
        }
    }

    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.topics.len() >= self.capacity()
    }

    /// Последний добавленный топик.
    pub fn last(&self) -> Option<&str> {
        self.topics.last().map(String::as_str)
    }

    pub fn contains(
        &self,
        topic: &str,
    ) -> bool {
        self.position(topic).is_some()
    }

    pub fn position(
        &self,
        topic: &str,
    ) -> Option<usize> {
        self.topics.iter().position(|t| t == topic)
    }

    /// Добавляет топик в конец списка.
    ///
    /// # Ошибки
    /// - [`HubError::DuplicateTopic`], если топик уже есть;
    /// - [`HubError::CapacityExceeded`], если реестр заполнен.
    pub fn push(
        &mut self,
        topic: &str,
    ) -> HubResult<()> {
        if self.contains(topic) {
            return Err(HubError::DuplicateTopic {
                topic: topic.to_string(),
            });
        }
        if self.is_full() {
            return Err(HubError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        self.topics.push(topic.to_string());
        Ok(())
    }

    /// Удаляет топик, сдвигая последующие на его место. Возвращает позицию,
    /// на которой он стоял.
    pub fn remove(
        &mut self,
        topic: &str,
    ) -> HubResult<usize> {
        let index = self
            .position(topic)
            .ok_or_else(|| HubError::TopicNotFound {
                topic: topic.to_string(),
            })?;
        self.topics.remove(index);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(capacity: u16) -> TopicsAccount {
        TopicsAccount::new(Pubkey::new_unique(), capacity)
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut reg = registry(4);
        for (i, t) in ["/t1", "/t2", "/t3"].iter().enumerate() {
            reg.push(t).unwrap();
            assert_eq!(reg.len(), i + 1);
            assert_eq!(reg.last(), Some(*t));
        }
    }

    #[test]
    fn test_duplicate_leaves_state_unchanged() {
        let mut reg = registry(4);
        reg.push("/a").unwrap();
        let before = reg.clone();

        assert_eq!(
            reg.push("/a"),
            Err(HubError::DuplicateTopic {
                topic: "/a".to_string()
            })
        );
        assert_eq!(reg, before);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut reg = registry(2);
        reg.push("/a").unwrap();
        reg.push("/b").unwrap();
        assert!(reg.is_full());
        assert_eq!(
            reg.push("/c"),
            Err(HubError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(reg.len(), 2);
    }

    /// Тест проверяет сдвиг влево: после удаления из середины соседи
    /// сохраняют относительный порядок.
    #[test]
    fn test_remove_shifts_left() {
        let mut reg = registry(8);
        for t in ["/a", "/b", "/c", "/d"] {
            reg.push(t).unwrap();
        }

        assert_eq!(reg.remove("/b"), Ok(1));
        assert_eq!(reg.topics(), ["/a", "/c", "/d"]);
        assert_eq!(reg.position("/c"), Some(1));
        assert_eq!(reg.last(), Some("/d"));
    }

    #[test]
    fn test_remove_missing() {
        let mut reg = registry(2);
        assert_eq!(
            reg.remove("/x"),
            Err(HubError::TopicNotFound {
                topic: "/x".to_string()
            })
        );
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut reg = registry(0);
        assert!(reg.is_full());
        assert!(matches!(
            reg.push("/a"),
            Err(HubError::CapacityExceeded { capacity: 0 })
        ));
    }
}
