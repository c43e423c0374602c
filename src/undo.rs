//! 以事务为单位的撤销/重做管理。

pub trait Undoable {
    type Snapshot;

    fn memento(&self) -> Self::Snapshot;
    fn revert(&mut self, snapshot: Self::Snapshot);
}

/// 撤销管理器。
///
/// 每个事务只保存目标在该事务中第一次修改前的快照。
pub struct Memento<T: Undoable> {
    current: Option<T::Snapshot>,
    undos: Vec<T::Snapshot>,
    redos: Vec<T::Snapshot>,
}

impl<T: Undoable> Default for Memento<T> {
    fn default() -> Self {
        Self {
            current: None,
            undos: Vec::new(),
            redos: Vec::new(),
        }
    }
}

impl<T: Undoable> Memento<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 结束当前事务并开启新事务；重做历史随之失效。
    pub fn open(&mut self) {
        self.close();
        self.redos.clear();
    }

    /// 在修改目标之前调用；新的修改会让重做历史失效。
    pub fn register(&mut self, target: &T) {
        if self.current.is_none() {
            self.redos.clear();
            self.current = Some(target.memento());
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some() || !self.undos.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    pub fn undo(&mut self, target: &mut T) -> bool {
        self.close();
        let Some(snapshot) = self.undos.pop() else {
            return false;
        };
        self.redos.push(target.memento());
        target.revert(snapshot);
        true
    }

    pub fn redo(&mut self, target: &mut T) -> bool {
        let Some(snapshot) = self.redos.pop() else {
            return false;
        };
        self.undos.push(target.memento());
        target.revert(snapshot);
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.undos.clear();
        self.redos.clear();
    }

    fn close(&mut self) {
        if let Some(snapshot) = self.current.take() {
            self.undos.push(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: i32,
    }

    impl Undoable for Counter {
        type Snapshot = i32;

        fn memento(&self) -> i32 {
            self.value
        }

        fn revert(&mut self, snapshot: i32) {
            self.value = snapshot;
        }
    }

    fn set(memento: &mut Memento<Counter>, counter: &mut Counter, value: i32) {
        memento.register(counter);
        counter.value = value;
    }

    #[test]
    fn first_snapshot_in_transaction_wins() {
        let mut memento = Memento::new();
        let mut counter = Counter::default();

        set(&mut memento, &mut counter, 1);
        set(&mut memento, &mut counter, 2);

        assert!(memento.undo(&mut counter));
        assert_eq!(counter.value, 0);
        assert!(!memento.undo(&mut counter), "nothing left to undo");
    }

    #[test]
    fn undo_then_redo_across_transactions() {
        let mut memento = Memento::new();
        let mut counter = Counter::default();

        set(&mut memento, &mut counter, 1);
        memento.open();
        set(&mut memento, &mut counter, 2);

        assert!(memento.undo(&mut counter));
        assert_eq!(counter.value, 1);
        assert!(memento.redo(&mut counter));
        assert_eq!(counter.value, 2);
        assert!(memento.undo(&mut counter));
        assert!(memento.undo(&mut counter));
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn opening_a_transaction_drops_redo_history() {
        let mut memento = Memento::new();
        let mut counter = Counter::default();

        set(&mut memento, &mut counter, 1);
        memento.undo(&mut counter);
        assert!(memento.can_redo());

        memento.open();
        assert!(!memento.can_redo());
        assert!(!memento.redo(&mut counter));
    }

    #[test]
    fn new_change_after_undo_drops_redo() {
        let mut memento = Memento::new();
        let mut counter = Counter::default();

        set(&mut memento, &mut counter, 1);
        memento.open();
        set(&mut memento, &mut counter, 2);
        assert!(memento.undo(&mut counter));
        assert_eq!(counter.value, 1);

        set(&mut memento, &mut counter, 3);

        assert!(!memento.can_redo());
        assert!(!memento.redo(&mut counter), "redo must not overwrite the new change");
        assert_eq!(counter.value, 3);
        assert!(memento.undo(&mut counter));
        assert_eq!(counter.value, 1);
    }
}
