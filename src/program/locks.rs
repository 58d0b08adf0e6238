use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::identity::Address;

/// Блокировки аккаунтов по адресу.
///
/// Запись в аккаунт исключительна на время одной операции, чтение
/// разделяемое. Операция, которой нужны два аккаунта, берёт их в порядке
/// хаб → реестр топиков и только на чтение.
#[derive(Debug, Default)]
pub(crate) struct AccountLocks {
    locks: DashMap<Address, Arc<RwLock<()>>>,
}

impl AccountLocks {
    fn lock_for(
        &self,
        address: &Address,
    ) -> Arc<RwLock<()>> {
        // Клон Arc отпускает шард DashMap до захвата самой блокировки.
        self.locks.entry(*address).or_default().clone()
    }

    /// Убирает запись адреса, если её больше никто не держит.
    fn release(
        &self,
        address: &Address,
        lock: Arc<RwLock<()>>,
    ) {
        drop(lock);
        // Клоны берутся только под блокировкой шарда, поэтому счётчик 1 здесь
        // означает, что ожидающих нет.
        self.locks
            .remove_if(address, |_, l| Arc::strong_count(l) == 1);
    }

    pub(crate) fn with_write<R>(
        &self,
        address: &Address,
        f: impl FnOnce() -> R,
    ) -> R {
        let lock = self.lock_for(address);
        let out = {
            let _guard = lock.write();
            f()
        };
        self.release(address, lock);
        out
    }

    pub(crate) fn with_read<R>(
        &self,
        address: &Address,
        f: impl FnOnce() -> R,
    ) -> R {
        let lock = self.lock_for(address);
        let out = {
            let _guard = lock.read();
            f()
        };
        self.release(address, lock);
        out
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use super::*;

    /// Тест проверяет, что запись под блокировкой адреса не перемешивается:
    /// чтение-изменение-запись из многих потоков не теряет инкрементов.
    #[test]
    fn test_write_is_exclusive_per_address() {
        let locks = Arc::new(AccountLocks::default());
        let counter = Arc::new(AtomicUsize::new(0));
        let addr = Address::new([1; 32]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        locks.with_write(&addr, || {
                            let v = counter.load(Ordering::Relaxed);
                            thread::yield_now();
                            counter.store(v + 1, Ordering::Relaxed);
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::Relaxed), 800);
    }

    #[test]
    fn test_reads_share_the_lock() {
        let locks = AccountLocks::default();
        let addr = Address::new([2; 32]);
        let inner = locks.with_read(&addr, || locks.with_read(&addr, || 7));
        assert_eq!(inner, 7);
    }

    #[test]
    fn test_different_addresses_do_not_block() {
        let locks = AccountLocks::default();
        let a = Address::new([3; 32]);
        let b = Address::new([4; 32]);
        let v = locks.with_write(&a, || locks.with_write(&b, || 1));
        assert_eq!(v, 1);
    }

    #[test]
    fn test_idle_entries_are_released() {
        let locks = AccountLocks::default();
        for i in 0..=255u8 {
            locks.with_read(&Address::new([i; 32]), || ());
        }
        assert_eq!(locks.len(), 0);

        let addr = Address::new([9; 32]);
        locks.with_read(&addr, || {
            locks.with_read(&addr, || ());
            assert_eq!(locks.len(), 1);
        });
        assert_eq!(locks.len(), 0);
    }
}
