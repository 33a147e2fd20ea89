use crate::domain::model::{Assignment, Family, Person};
use crate::utils::error::AssignmentError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Retry budget for the unique strategy when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStrategy {
    /// One draw per giver from everyone except themselves and their partner.
    /// Several givers may end up with the same recipient.
    #[default]
    Independent,
    /// Every person is drawn exactly once. Restarts when a giver runs out of
    /// candidates.
    Unique,
}

/// A validated set of families: every person has exactly one partner.
#[derive(Debug, Clone)]
pub struct Population {
    people: Vec<Person>,
    partners: HashMap<Person, Person>,
}

impl Population {
    pub fn from_families(families: &[Family]) -> Result<Self, AssignmentError> {
        // 先檢查每個家庭的形狀，再檢查跨家庭重複
        let mut pairs = Vec::with_capacity(families.len());
        for (index, family) in families.iter().enumerate() {
            match family.members() {
                [a, b] if a != b && !a.name().trim().is_empty() && !b.name().trim().is_empty() => {
                    pairs.push((a, b))
                }
                members => {
                    return Err(AssignmentError::MalformedFamily {
                        index,
                        members: members.iter().map(|p| p.name().to_string()).collect(),
                    })
                }
            }
        }

        let mut people = Vec::with_capacity(pairs.len() * 2);
        let mut partners = HashMap::with_capacity(pairs.len() * 2);
        for (a, b) in pairs {
            for (person, partner) in [(a, b), (b, a)] {
                if partners.insert(person.clone(), partner.clone()).is_some() {
                    return Err(AssignmentError::DuplicateMembership {
                        person: person.name().to_string(),
                    });
                }
                people.push(person.clone());
            }
        }

        // 兩個人永遠互為伴侶，無法抽籤
        if people.len() < 3 {
            return Err(AssignmentError::PopulationTooSmall { size: people.len() });
        }

        Ok(Self { people, partners })
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn partner_of(&self, person: &Person) -> Option<&Person> {
        self.partners.get(person)
    }

    pub fn contains(&self, person: &Person) -> bool {
        self.partners.contains_key(person)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// True when `giver` may not give to `recipient`.
    pub fn forbids(&self, giver: &Person, recipient: &Person) -> bool {
        giver == recipient || self.partner_of(giver) == Some(recipient)
    }
}

pub struct AssignmentEngine<R: Rng> {
    rng: R,
    strategy: AssignmentStrategy,
    max_attempts: usize,
}

impl AssignmentEngine<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AssignmentEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            strategy: AssignmentStrategy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_strategy(mut self, strategy: AssignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    pub fn assign(&mut self, families: &[Family]) -> Result<Assignment, AssignmentError> {
        let population = Population::from_families(families)?;
        self.assign_population(&population)
    }

    pub fn assign_population(
        &mut self,
        population: &Population,
    ) -> Result<Assignment, AssignmentError> {
        tracing::debug!(
            "Drawing {:?} assignment for {} people",
            self.strategy,
            population.len()
        );

        match self.strategy {
            AssignmentStrategy::Independent => self.draw_independent(population),
            AssignmentStrategy::Unique => self.draw_unique(population),
        }
    }

    fn draw_independent(&mut self, population: &Population) -> Result<Assignment, AssignmentError> {
        let people = population.people();
        let mut pairs = Vec::with_capacity(people.len());

        for giver in people {
            let candidates: Vec<&Person> = people
                .iter()
                .filter(|candidate| !population.forbids(giver, candidate))
                .collect();

            let recipient = candidates
                .choose(&mut self.rng)
                .copied()
                .ok_or(AssignmentError::PopulationTooSmall { size: people.len() })?;

            pairs.push((giver.clone(), recipient.clone()));
        }

        Ok(Assignment::from_pairs(pairs))
    }

    fn draw_unique(&mut self, population: &Population) -> Result<Assignment, AssignmentError> {
        for attempt in 1..=self.max_attempts {
            if let Some(pairs) = self.try_draw_unique(population) {
                tracing::debug!("Unique assignment found on attempt {}", attempt);
                return Ok(Assignment::from_pairs(pairs));
            }
            tracing::debug!("Attempt {} ran out of candidates, trying again", attempt);
        }

        Err(AssignmentError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }

    /// One pass over the givers with a shrinking pool. `None` when some giver
    /// is left with nobody to draw.
    fn try_draw_unique(&mut self, population: &Population) -> Option<Vec<(Person, Person)>> {
        let people = population.people();
        let mut taken: HashSet<&Person> = HashSet::with_capacity(people.len());
        let mut pairs = Vec::with_capacity(people.len());

        for giver in people {
            let candidates: Vec<&Person> = people
                .iter()
                .filter(|candidate| {
                    !population.forbids(giver, candidate) && !taken.contains(candidate)
                })
                .collect();

            let recipient = *candidates.choose(&mut self.rng)?;
            taken.insert(recipient);
            pairs.push((giver.clone(), recipient.clone()));
        }

        Some(pairs)
    }
}

/// Re-checks a finished assignment against the population before anyone is
/// notified.
pub fn verify_assignment(
    assignment: &Assignment,
    population: &Population,
    strategy: AssignmentStrategy,
) -> Result<(), AssignmentError> {
    let violation = |giver: &Person, recipient: Option<&Person>, reason: &str| {
        AssignmentError::ConstraintViolated {
            giver: giver.name().to_string(),
            recipient: recipient.map(|r| r.name().to_string()),
            reason: reason.to_string(),
        }
    };

    let mut givers = HashSet::with_capacity(assignment.len());
    let mut recipients = HashSet::with_capacity(assignment.len());

    for (giver, recipient) in assignment.iter() {
        if !population.contains(giver) {
            return Err(violation(giver, Some(recipient), "unknown giver"));
        }
        if !givers.insert(giver) {
            return Err(violation(giver, Some(recipient), "giver assigned more than once"));
        }
        if !population.contains(recipient) {
            return Err(violation(giver, Some(recipient), "unknown recipient"));
        }
        if giver == recipient {
            return Err(violation(giver, Some(recipient), "assigned to themselves"));
        }
        if population.partner_of(giver) == Some(recipient) {
            return Err(violation(giver, Some(recipient), "assigned to family partner"));
        }
        if strategy == AssignmentStrategy::Unique && !recipients.insert(recipient) {
            return Err(violation(giver, Some(recipient), "recipient drawn twice"));
        }
    }

    if let Some(missing) = population.people().iter().find(|p| !givers.contains(p)) {
        return Err(violation(missing, None, "no recipient"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_people() -> Vec<Family> {
        vec![Family::pair("A", "B"), Family::pair("C", "D")]
    }

    #[test]
    fn test_population_partners() {
        let population = Population::from_families(&four_people()).unwrap();
        assert_eq!(population.len(), 4);
        assert_eq!(population.partner_of(&Person::from("A")), Some(&Person::from("B")));
        assert_eq!(population.partner_of(&Person::from("D")), Some(&Person::from("C")));
        assert!(population.forbids(&Person::from("C"), &Person::from("C")));
        assert!(!population.forbids(&Person::from("A"), &Person::from("C")));
    }

    #[test]
    fn test_single_family_is_too_small() {
        let err = Population::from_families(&[Family::pair("A", "B")]).unwrap_err();
        assert_eq!(err, AssignmentError::PopulationTooSmall { size: 2 });

        let err = Population::from_families(&[]).unwrap_err();
        assert_eq!(err, AssignmentError::PopulationTooSmall { size: 0 });
    }

    #[test]
    fn test_malformed_families() {
        let same_name = [Family::pair("A", "A"), Family::pair("C", "D")];
        assert!(matches!(
            Population::from_families(&same_name),
            Err(AssignmentError::MalformedFamily { index: 0, .. })
        ));

        let trio = [
            Family::pair("A", "B"),
            Family::new(vec!["C".into(), "D".into(), "E".into()]),
        ];
        assert!(matches!(
            Population::from_families(&trio),
            Err(AssignmentError::MalformedFamily { index: 1, .. })
        ));

        let blank = [Family::pair("A", " "), Family::pair("C", "D")];
        assert!(matches!(
            Population::from_families(&blank),
            Err(AssignmentError::MalformedFamily { .. })
        ));
    }

    #[test]
    fn test_duplicate_membership() {
        let families = [Family::pair("A", "B"), Family::pair("B", "C")];
        assert_eq!(
            Population::from_families(&families).unwrap_err(),
            AssignmentError::DuplicateMembership {
                person: "B".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_family_reported_before_earlier_duplicate() {
        let families = [
            Family::pair("A", "B"),
            Family::pair("B", "C"),
            Family::pair("D", "D"),
        ];
        assert!(matches!(
            Population::from_families(&families),
            Err(AssignmentError::MalformedFamily { index: 2, .. })
        ));
    }

    #[test]
    fn test_independent_draw_respects_exclusions() {
        let families = four_people();
        let population = Population::from_families(&families).unwrap();

        for seed in 0..200 {
            let assignment = AssignmentEngine::seeded(seed).assign(&families).unwrap();
            assert_eq!(assignment.len(), 4);
            verify_assignment(&assignment, &population, AssignmentStrategy::Independent)
                .unwrap();
        }
    }

    #[test]
    fn test_unique_draw_has_distinct_recipients() {
        let families = vec![
            Family::pair("A", "B"),
            Family::pair("C", "D"),
            Family::pair("E", "F"),
        ];
        let population = Population::from_families(&families).unwrap();

        let mut successes = 0;
        for seed in 0..100 {
            let mut engine = AssignmentEngine::seeded(seed)
                .with_strategy(AssignmentStrategy::Unique)
                .with_max_attempts(100);
            if let Ok(assignment) = engine.assign(&families) {
                verify_assignment(&assignment, &population, AssignmentStrategy::Unique).unwrap();
                successes += 1;
            }
        }
        assert!(successes > 0);
    }

    #[test]
    fn test_unique_with_zero_attempts_is_exhausted() {
        let mut engine = AssignmentEngine::seeded(7)
            .with_strategy(AssignmentStrategy::Unique)
            .with_max_attempts(0);
        assert_eq!(
            engine.assign(&four_people()).unwrap_err(),
            AssignmentError::RetriesExhausted { attempts: 0 }
        );
    }

    #[test]
    fn test_verify_rejects_partner_and_missing_giver() {
        let population = Population::from_families(&four_people()).unwrap();

        let partner = Assignment::from_pairs(vec![
            ("A".into(), "B".into()),
            ("B".into(), "C".into()),
            ("C".into(), "A".into()),
            ("D".into(), "A".into()),
        ]);
        assert!(matches!(
            verify_assignment(&partner, &population, AssignmentStrategy::Independent),
            Err(AssignmentError::ConstraintViolated { ref reason, .. }) if reason == "assigned to family partner"
        ));

        let partial = Assignment::from_pairs(vec![
            ("A".into(), "C".into()),
            ("B".into(), "D".into()),
            ("C".into(), "A".into()),
        ]);
        assert!(matches!(
            verify_assignment(&partial, &population, AssignmentStrategy::Independent),
            Err(AssignmentError::ConstraintViolated { recipient: None, .. })
        ));
    }

    #[test]
    fn test_verify_unique_rejects_shared_recipient() {
        let population = Population::from_families(&four_people()).unwrap();
        let shared = Assignment::from_pairs(vec![
            ("A".into(), "C".into()),
            ("B".into(), "C".into()),
            ("C".into(), "A".into()),
            ("D".into(), "B".into()),
        ]);
        assert!(verify_assignment(&shared, &population, AssignmentStrategy::Independent).is_ok());
        assert!(verify_assignment(&shared, &population, AssignmentStrategy::Unique).is_err());
    }
}
