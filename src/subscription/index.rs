use std::sync::Arc;

use dashmap::{DashMap, DashSet};

use crate::identity::{Address, Pubkey};

type Topics = DashMap<Arc<str>, DashSet<Pubkey>>;

/// Конкурентный индекс подписок.
///
/// Двухуровневая карта: хаб → топик → множество подписчиков. Каждый
/// подписчик хранится отдельной записью множества, поэтому одновременные
/// подписки на одну пару не теряют обновлений, а повторная подписка не
/// создаёт дубликата.
///
/// Записи создаются только при подписке. Чтение по неизвестному хабу или
/// топику ищет по заимствованному `&str` и ничего не аллоцирует, а закрытие
/// хаба удаляет его поддерево целиком.
#[derive(Debug, Default)]
pub struct SubscriptionIndex {
    hubs: DashMap<Address, Topics>,
}

impl SubscriptionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет подписку. Возвращает `false`, если она уже была.
    pub fn insert(
        &self,
        hub: Address,
        topic: &str,
        subscriber: Pubkey,
    ) -> bool {
        let topics = self.hubs.entry(hub).or_default();
        if let Some(set) = topics.get(topic) {
            return set.insert(subscriber);
        }
        let set = topics.entry(Arc::from(topic)).or_default();
        set.insert(subscriber)
    }

    /// Подписчики пары, отсортированные по ключу для стабильного порядка
    /// рассылки.
    pub fn subscribers(
        &self,
        hub: &Address,
        topic: &str,
    ) -> Vec<Pubkey> {
        let Some(topics) = self.hubs.get(hub) else {
            return Vec::new();
        };
        let Some(set) = topics.get(topic) else {
            return Vec::new();
        };
        let mut out: Vec<Pubkey> = set.iter().map(|s| *s).collect();
        out.sort_unstable();
        out
    }

    pub fn is_subscribed(
        &self,
        hub: &Address,
        topic: &str,
        subscriber: &Pubkey,
    ) -> bool {
        let Some(topics) = self.hubs.get(hub) else {
            return false;
        };
        let found = match topics.get(topic) {
            Some(set) => set.contains(subscriber),
            None => false,
        };
        found
    }

    /// Удаляет все подписки хаба. Возвращает число удалённых подписок.
    pub fn remove_hub(
        &self,
        hub: &Address,
    ) -> usize {
        match self.hubs.remove(hub) {
            Some((_, topics)) => topics.iter().map(|e| e.value().len()).sum(),
            None => 0,
        }
    }

    /// Общее число подписок во всех хабах.
    pub fn subscription_count(&self) -> usize {
        let mut total = 0;
        for topics in self.hubs.iter() {
            total += topics.iter().map(|e| e.value().len()).sum::<usize>();
        }
        total
    }

    /// Число хабов, у которых есть хотя бы одна запись в индексе.
    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    /// Число топиков хаба, на которые есть хотя бы одна подписка.
    pub fn topic_count(
        &self,
        hub: &Address,
    ) -> usize {
        let Some(topics) = self.hubs.get(hub) else {
            return 0;
        };
        let count = topics.iter().filter(|e| !e.value().is_empty()).count();
        count
    }
}
