//! One-vote-per-identity tally.

use std::collections::{BTreeMap, HashSet};

use crate::entity::{Entity, EventRecord, PayloadError};
use crate::error::StoreError;
use crate::hashmap::HashMapRepository;
use crate::identity::Identity;
use crate::log::{self, LogEntry, LogRange};
use crate::repository::Repository;
use crate::store::Store;

/// A ballot behind the transaction boundary.
pub type BallotStore<R = HashMapRepository> = Store<Ballot, R>;

/// Logged for every accepted vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voted {
    pub voter: Identity,
    pub candidate: String,
}

impl Voted {
    pub const NAME: &'static str = "Voted";
}

impl TryFrom<&EventRecord> for Voted {
    type Error = PayloadError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        if record.event_name != Self::NAME {
            return Err(PayloadError::new(format!(
                "Unknown event: {}",
                record.event_name
            )));
        }
        let (voter, candidate): (String, String) = record.decode()?;
        Ok(Voted {
            voter: Identity::new(voter),
            candidate,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Ballot {
    entity: Entity,
    votes: BTreeMap<String, u64>,
    voters: HashSet<Identity>,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast `voter`'s only vote. A second vote fails with `AlreadyVoted`.
    pub fn vote(&mut self, voter: &Identity, candidate: impl Into<String>) -> Result<(), StoreError> {
        if self.voters.contains(voter) {
            return Err(StoreError::AlreadyVoted {
                voter: voter.clone(),
            });
        }

        let candidate = candidate.into();
        self.entity
            .digest(Voted::NAME, voter, &(voter.as_str(), &candidate))?;
        self.voters.insert(voter.clone());
        *self.votes.entry(candidate).or_insert(0) += 1;
        Ok(())
    }

    /// Votes for `candidate`; zero for names nobody voted for.
    pub fn votes(&self, candidate: &str) -> u64 {
        self.votes.get(candidate).copied().unwrap_or(0)
    }

    pub fn has_voted(&self, identity: &Identity) -> bool {
        self.voters.contains(identity)
    }

    /// Candidate → votes, ordered by candidate name.
    pub fn tally(&self) -> &BTreeMap<String, u64> {
        &self.votes
    }

    pub fn history(&self, range: LogRange) -> Result<Vec<LogEntry<Voted>>, StoreError> {
        log::decode_all(self.entity.query(Voted::NAME, range))
    }

    fn replay(&mut self, event: &EventRecord) -> Result<(), StoreError> {
        let voted = Voted::try_from(event)?;
        self.vote(&voted.voter, voted.candidate)
    }
}

crate::impl_aggregate!(Ballot, "ballot", entity, replay);

impl<R: Repository> Store<Ballot, R> {
    pub fn vote(&self, voter: &Identity, candidate: impl Into<String>) -> Result<(), StoreError> {
        let candidate = candidate.into();
        self.execute(|ballot| ballot.vote(voter, candidate))
    }

    pub fn votes(&self, candidate: &str) -> Result<u64, StoreError> {
        self.read(|ballot| Ok(ballot.votes(candidate)))
    }

    pub fn has_voted(&self, identity: &Identity) -> Result<bool, StoreError> {
        self.read(|ballot| Ok(ballot.has_voted(identity)))
    }

    pub fn tally(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        self.read(|ballot| Ok(ballot.tally().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_counts_and_marks_voter() {
        let mut ballot = Ballot::new();
        let owner = Identity::new("owner");
        assert!(!ballot.has_voted(&owner));

        ballot.vote(&owner, "Alice").unwrap();
        assert_eq!(ballot.votes("Alice"), 1);
        assert_eq!(ballot.votes("Bob"), 0);
        assert!(ballot.has_voted(&owner));
    }

    #[test]
    fn double_vote_is_rejected_without_side_effects() {
        let mut ballot = Ballot::new();
        let owner = Identity::new("owner");
        ballot.vote(&owner, "Alice").unwrap();

        assert_eq!(
            ballot.vote(&owner, "Bob"),
            Err(StoreError::AlreadyVoted {
                voter: owner.clone()
            })
        );
        assert_eq!(ballot.votes("Bob"), 0);
        assert_eq!(ballot.entity.version(), 1);
    }

    #[test]
    fn voter_is_the_logged_actor() {
        let mut ballot = Ballot::new();
        let addr1 = Identity::new("0x70997970");
        ballot.vote(&addr1, "Bob").unwrap();

        let history = ballot.history(LogRange::all()).unwrap();
        assert_eq!(history[0].actor, addr1);
        assert_eq!(
            history[0].event,
            Voted {
                voter: addr1.clone(),
                candidate: "Bob".into()
            }
        );
    }

    #[test]
    fn tally_is_ordered_by_candidate() {
        let mut ballot = Ballot::new();
        ballot.vote(&Identity::new("a"), "Zed").unwrap();
        ballot.vote(&Identity::new("b"), "Alice").unwrap();
        ballot.vote(&Identity::new("c"), "Alice").unwrap();

        let tally: Vec<(&str, u64)> = ballot
            .tally()
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        assert_eq!(tally, vec![("Alice", 2), ("Zed", 1)]);
    }
}
