use super::{AchievementDef, Category, Metric, ProgressMode, Rarity, Rule};

use Category::*;
use Metric::*;
use ProgressMode::*;
use Rarity::*;

#[allow(clippy::too_many_arguments)]
const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    category: Category,
    rarity: Rarity,
    target: u32,
    rule: Rule,
    progress: ProgressMode,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        icon,
        category,
        rarity,
        target,
        rule,
        progress,
    }
}

const fn hours(min: u32, max: u32) -> Rule {
    Rule::Within {
        metric: CheckInHour,
        min,
        max,
    }
}

/// Every achievement, in display order. Ids are stable keys; never reuse one.
#[rustfmt::skip]
pub const CATALOG: &[AchievementDef] = &[
    // milestone
    def("first_step", "First Step", "Log your very first check-in. Every journey starts somewhere.", "🐣", Milestone, Common, 1, Rule::Reach(TotalCount), Live),
    def("ten_times", "Getting the Hang of It", "Log 10 check-ins in total.", "🔟", Milestone, Common, 10, Rule::Reach(TotalCount), Live),
    def("fifty_times", "Rising Star", "Log 50 check-ins in total.", "⭐", Milestone, Rare, 50, Rule::Reach(TotalCount), Live),
    def("hundred_times", "Forged in a Hundred", "Log 100 check-ins in total.", "💯", Milestone, Rare, 100, Rule::Reach(TotalCount), Live),
    def("two_fifty", "Seasoned Expert", "Log 250 check-ins in total.", "🎓", Milestone, Epic, 250, Rule::Reach(TotalCount), Live),
    def("five_hundred", "Grandmaster", "Log 500 check-ins in total. Faster than 99.9% of users.", "🏅", Milestone, Epic, 500, Rule::Reach(TotalCount), Live),
    def("thousand", "Monarch of Habits", "Log 1000 check-ins in total. A living legend.", "👑", Milestone, Legendary, 1000, Rule::Reach(TotalCount), Live),
    // streak
    def("three_streak", "Three-Day Fisherman", "Check in 3 days in a row.", "🐟", Streak, Common, 3, Rule::Reach(CurrentStreak), Live),
    def("seven_streak", "Week Without Rest", "Check in 7 days in a row.", "🔥", Streak, Common, 7, Rule::Reach(CurrentStreak), Live),
    def("fourteen_streak", "Fortnight Iron Man", "Check in 14 days in a row.", "🦾", Streak, Rare, 14, Rule::Reach(CurrentStreak), Live),
    def("thirty_streak", "Monthly Machine", "Check in 30 days in a row. Are your hands okay?", "🤖", Streak, Epic, 30, Rule::Reach(CurrentStreak), Live),
    def("sixty_streak", "Phoenix", "Check in 60 days in a row.", "🐦‍🔥", Streak, Epic, 60, Rule::Reach(CurrentStreak), Live),
    def("hundred_streak", "Perpetual Motion", "Check in 100 days in a row. Seriously?", "♾️", Streak, Legendary, 100, Rule::Reach(CurrentStreak), Live),
    // funny
    def("midnight_warrior", "Midnight Warrior", "Check in between 00:00 and 03:59.", "🦉", Funny, Rare, 1, hours(0, 3), OnUnlock),
    def("early_bird", "First Light", "Check in between 05:00 and 07:59. Really?", "🌅", Funny, Rare, 1, hours(5, 7), OnUnlock),
    def("speed_demon", "Speed Demon", "Check in 5 times in one day.", "⚡", Funny, Epic, 5, Rule::Reach(TodayCount), OnUnlock),
    def("marathon_runner", "Marathon Runner", "Check in 8 times in one day. Hydrate.", "🏃", Funny, Epic, 8, Rule::Reach(TodayCount), OnUnlock),
    def("perfect_week", "Perfect Week", "Check in on all seven days of a week.", "✨", Funny, Rare, 7, Rule::Reach(WeekCoverage), Live),
    def("mood_master", "Mood Swings", "Use all five moods.", "🎭", Funny, Common, 5, Rule::Reach(DistinctMoods), Live),
    def("always_happy", "Optimist", "Log the best mood 10 check-ins in a row.", "😁", Funny, Rare, 10, Rule::Reach(HappyRun), Live),
    def("zen_master", "Zen Master", "Come back after 3 or more days without a check-in.", "🧘", Funny, Rare, 1, Rule::Within { metric: IdleDays, min: 3, max: u32::MAX }, OnUnlock),
    def("note_writer", "Diarist", "Write notes on 20 check-ins in one day.", "📝", Funny, Common, 20, Rule::Reach(NoteCount), Live),
    def("weekend_warrior", "Weekend Warrior", "Check in on 4 consecutive weekends.", "🗡️", Funny, Rare, 4, Rule::Reach(WeekendRun), Live),
    // extreme
    def("iron_hand", "Iron Hand", "Log more than 200 check-ins in total.", "🤚", Extreme, Epic, 200, Rule::Reach(TotalCount), Live),
    def("legend_of_lu", "Living Legend", "Check in 10 times in one day. Are you sure?", "🗿", Extreme, Legendary, 10, Rule::Reach(TodayCount), OnUnlock),
    def("social_butterfly", "Social Butterfly", "Add 5 friends.", "🦋", Extreme, Rare, 5, Rule::Reach(FriendCount), Live),
    def("pk_winner", "PK Champion", "Win 3 head-to-heads against friends.", "🏆", Extreme, Epic, 3, Rule::Reach(PkWins), Live),
    def("all_seasons", "All Seasons", "Check in 120 days in a row.", "🌍", Extreme, Legendary, 120, Rule::Reach(CurrentStreak), Live),
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|d| d.id == id)
}
