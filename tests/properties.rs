mod support;

use proptest::prelude::*;
use sourced_stores::{Aggregate, Identity, LogRange, StoreError, TodoEvent, TodoList};

#[derive(Clone, Debug)]
enum Op {
    Add { caller: usize, title: String },
    Complete { caller: usize, id: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, "[a-z ]{0,8}").prop_map(|(caller, title)| Op::Add { caller, title }),
        (0..3usize, 0..24u64).prop_map(|(caller, id)| Op::Complete { caller, id }),
    ]
}

proptest! {
    #[test]
    fn kth_add_returns_k(titles in proptest::collection::vec(".{0,12}", 0..40)) {
        let caller = Identity::new("owner");
        let mut list = TodoList::new();
        for (k, title) in titles.iter().enumerate() {
            prop_assert_eq!(list.add_todo(&caller, title.clone(), "").unwrap(), k as u64);
        }
        prop_assert_eq!(list.count(), titles.len() as u64);
    }

    #[test]
    fn list_matches_model(ops in proptest::collection::vec(op(), 0..60)) {
        let signers = support::signers(3);
        let mut list = TodoList::new();
        let mut completed: Vec<bool> = Vec::new();
        let mut added = Vec::new();
        let mut completions = Vec::new();

        for op in ops {
            let version = list.entity().version();
            match op {
                Op::Add { caller, title } => {
                    let id = list.add_todo(&signers[caller], title.clone(), "body").unwrap();
                    prop_assert_eq!(id, completed.len() as u64);
                    completed.push(false);
                    added.push((id, title));
                    prop_assert_eq!(list.entity().version(), version + 1);
                }
                Op::Complete { caller, id } => {
                    let result = list.complete_todo(&signers[caller], id);
                    let count = completed.len() as u64;
                    if id >= count {
                        prop_assert_eq!(result, Err(StoreError::OutOfRange { id, count }));
                        prop_assert_eq!(list.entity().version(), version);
                    } else if completed[id as usize] {
                        prop_assert_eq!(result, Err(StoreError::AlreadyCompleted { id }));
                        prop_assert_eq!(list.entity().version(), version);
                    } else {
                        prop_assert!(result.is_ok());
                        completed[id as usize] = true;
                        completions.push(id);
                        prop_assert_eq!(list.entity().version(), version + 1);
                    }
                }
            }
        }

        let expected_active: Vec<u64> = completed
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(id, _)| id as u64)
            .collect();
        let active = list.active_ids();
        prop_assert_eq!(&active, &expected_active);
        let done = completed.iter().filter(|done| **done).count();
        prop_assert_eq!(active.len() + done, list.count() as usize);

        let logged_adds: Vec<(u64, String)> = list
            .history(TodoEvent::ADDED, LogRange::all())
            .unwrap()
            .into_iter()
            .map(|entry| match entry.event {
                TodoEvent::Added { id, title, .. } => (id, title),
                TodoEvent::Completed { id } => (id, String::new()),
            })
            .collect();
        prop_assert_eq!(logged_adds, added);

        let logged_completions: Vec<u64> = list
            .history(TodoEvent::COMPLETED, LogRange::all())
            .unwrap()
            .iter()
            .map(|entry| entry.event.id())
            .collect();
        prop_assert_eq!(logged_completions, completions);
    }
}
