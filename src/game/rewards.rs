use super::data::Reward;

fn reward(id: &str, title: &str, description: &str, required_level: u32) -> Reward {
    Reward {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: String::new(),
        required_level,
        unlocked: false,
    }
}

/// Catalog seeded into a fresh snapshot, everything locked.
pub fn default_rewards() -> Vec<Reward> {
    vec![
        reward("1", "Task Master", "Complete your first 5 tasks", 1),
        reward("2", "Rising Star", "Reach Level 2 for the first time", 2),
        reward("3", "Productivity Pro", "Complete 3 high priority tasks", 3),
        reward("4", "Consistency King", "Maintain a 5-day streak", 5),
        reward("5", "Goal Getter", "Complete 10 tasks in total", 4),
        reward(
            "6",
            "Time Master",
            "Complete all tasks before their due date for a week",
            6,
        ),
        reward(
            "7",
            "Priority Expert",
            "Complete 5 high priority tasks in a row",
            7,
        ),
        reward(
            "8",
            "Planning Perfection",
            "Create and complete tasks for 14 consecutive days",
            10,
        ),
    ]
}

/// Flips every locked reward whose gate the new level reaches. Each entry is
/// checked independently; unlocking never reverses, whatever level is passed
/// in later. Newly unlocked rewards come back in catalog order.
pub fn recompute_unlocks(rewards: &[Reward], new_level: u32) -> (Vec<Reward>, Vec<Reward>) {
    let mut updated = Vec::with_capacity(rewards.len());
    let mut newly_unlocked = vec![];

    for reward in rewards {
        let mut reward = reward.clone();
        if !reward.unlocked && new_level >= reward.required_level {
            reward.unlocked = true;
            newly_unlocked.push(reward.clone());
        }
        updated.push(reward);
    }

    (updated, newly_unlocked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(levels: &[u32]) -> Vec<Reward> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| reward(&i.to_string(), "reward", "", *level))
            .collect()
    }

    #[test]
    fn default_catalog_starts_fully_locked() {
        let rewards = default_rewards();

        assert_eq!(rewards.len(), 8);
        assert!(rewards.iter().all(|r| !r.unlocked));
    }

    #[test]
    fn one_level_up_can_unlock_several_rewards() {
        let (updated, newly) = recompute_unlocks(&catalog(&[1, 2, 3]), 3);

        assert!(updated.iter().all(|r| r.unlocked));
        assert_eq!(newly.len(), 3);
        // catalog order, not gate order
        assert_eq!(newly[0].id, "0");
        assert_eq!(newly[1].id, "1");
        assert_eq!(newly[2].id, "2");
    }

    #[test]
    fn catalog_order_is_independent_of_gate_order() {
        let (updated, newly) = recompute_unlocks(&catalog(&[5, 1, 3]), 3);

        assert!(!updated[0].unlocked);
        assert!(updated[1].unlocked);
        assert!(updated[2].unlocked);
        assert_eq!(newly.len(), 2);
        assert_eq!(newly[0].id, "1");
        assert_eq!(newly[1].id, "2");
    }

    #[test]
    fn unlocking_never_reverses() {
        let (unlocked, _) = recompute_unlocks(&catalog(&[1, 2, 3]), 3);
        // progress corrected downward afterwards
        let (still_unlocked, newly) = recompute_unlocks(&unlocked, 1);

        assert!(still_unlocked.iter().all(|r| r.unlocked));
        assert!(newly.is_empty());
    }

    #[test]
    fn already_unlocked_rewards_are_not_reported_again() {
        let (updated, _) = recompute_unlocks(&catalog(&[1, 2]), 2);
        let (_, newly) = recompute_unlocks(&updated, 3);

        assert!(newly.is_empty());
    }
}
