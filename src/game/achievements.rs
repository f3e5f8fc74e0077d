use super::data::{AchievementStatus, Priority, Reward, Task, UserProgress};

#[derive(Debug, Clone, Copy)]
pub enum Criterion {
    CompletedTasks { target: u32 },
    CompletedWithPriority { priority: Priority, target: u32 },
    LevelReached { target: u32 },
    RewardsUnlocked { target: u32 },
    /// Every priority must individually reach the threshold; current and
    /// target report the capped per-category sum so one category cannot
    /// dominate the percentage.
    BalancedPriorities { per_priority: u32 },
    /// Stand-in for "N tasks in a single day". Tasks carry no completion
    /// timestamp, so this counts total completed tasks instead.
    /// TODO: bucket by completion date once tasks record one.
    SingleDayBurst { target: u32 },
    /// Non-functional repeat-task rule; reports fixed partial progress and
    /// never completes.
    Placeholder { current: u32, target: u32 },
}

pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub criterion: Criterion,
}

pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "task_master",
        title: "Task Master",
        description: "Complete 10 tasks of any priority",
        criterion: Criterion::CompletedTasks { target: 10 },
    },
    AchievementDef {
        id: "high_achiever",
        title: "High Achiever",
        description: "Complete 5 high priority tasks",
        criterion: Criterion::CompletedWithPriority {
            priority: Priority::High,
            target: 5,
        },
    },
    AchievementDef {
        id: "level_up",
        title: "Level Up",
        description: "Reach level 5",
        criterion: Criterion::LevelReached { target: 5 },
    },
    AchievementDef {
        id: "healthy_habits",
        title: "Healthy Habits",
        description: "Complete 7 health-related tasks",
        // low priority stands in for health-related
        criterion: Criterion::CompletedWithPriority {
            priority: Priority::Low,
            target: 7,
        },
    },
    AchievementDef {
        id: "reward_collector",
        title: "Reward Collector",
        description: "Unlock 5 rewards",
        criterion: Criterion::RewardsUnlocked { target: 5 },
    },
    AchievementDef {
        id: "balanced_life",
        title: "Balanced Life",
        description: "Complete at least 3 tasks of each priority level",
        criterion: Criterion::BalancedPriorities { per_priority: 3 },
    },
    AchievementDef {
        id: "productivity_streak",
        title: "Productivity Streak",
        description: "Complete at least 5 tasks in a single day",
        criterion: Criterion::SingleDayBurst { target: 5 },
    },
    AchievementDef {
        id: "task_wizard",
        title: "Task Wizard",
        description: "Complete 25 tasks of any priority",
        criterion: Criterion::CompletedTasks { target: 25 },
    },
    AchievementDef {
        id: "habit_former",
        title: "Habit Former",
        description: "Complete the same task 3 days in a row",
        criterion: Criterion::Placeholder {
            current: 1,
            target: 3,
        },
    },
    AchievementDef {
        id: "level_10_master",
        title: "Level 10 Master",
        description: "Reach the maximum level of 10",
        criterion: Criterion::LevelReached { target: 10 },
    },
];

fn percent(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 100.0;
    }

    (f64::from(current) / f64::from(target) * 100.0).min(100.0)
}

fn completed_count(tasks: &[Task]) -> u32 {
    tasks.iter().filter(|task| task.completed).count() as u32
}

fn completed_with_priority(tasks: &[Task], priority: Priority) -> u32 {
    tasks
        .iter()
        .filter(|task| task.completed && task.priority == priority)
        .count() as u32
}

fn evaluate_criterion(
    criterion: Criterion,
    tasks: &[Task],
    progress: &UserProgress,
    rewards: &[Reward],
) -> (bool, u32, u32) {
    match criterion {
        Criterion::CompletedTasks { target } | Criterion::SingleDayBurst { target } => {
            let current = completed_count(tasks);
            (current >= target, current, target)
        }
        Criterion::CompletedWithPriority { priority, target } => {
            let current = completed_with_priority(tasks, priority);
            (current >= target, current, target)
        }
        Criterion::LevelReached { target } => (progress.level >= target, progress.level, target),
        Criterion::RewardsUnlocked { target } => {
            let current = rewards.iter().filter(|reward| reward.unlocked).count() as u32;
            (current >= target, current, target)
        }
        Criterion::BalancedPriorities { per_priority } => {
            let mut capped_sum = 0;
            let mut all_met = true;
            for priority in Priority::ALL {
                let count = completed_with_priority(tasks, priority);
                all_met &= count >= per_priority;
                capped_sum += count.min(per_priority);
            }
            let target = per_priority * Priority::ALL.len() as u32;
            (all_met, capped_sum, target)
        }
        Criterion::Placeholder { current, target } => (false, current, target),
    }
}

/// Recomputes the whole catalog from scratch; achievements hold no state of
/// their own.
pub fn evaluate_achievements(
    tasks: &[Task],
    progress: &UserProgress,
    rewards: &[Reward],
) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|def| {
            let (completed, current, target) =
                evaluate_criterion(def.criterion, tasks, progress, rewards);

            AchievementStatus {
                id: def.id,
                title: def.title,
                description: def.description,
                completed,
                progress: percent(current, target),
                target,
                current,
            }
        })
        .collect()
}
