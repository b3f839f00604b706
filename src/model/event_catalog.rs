/// Label carried by the center cell.
pub const FREE_SPACE: &str = "FREE SPACE";

/// Every prompt a card can be drawn from.
pub const BINGO_EVENTS: [&str; 45] = [
    // silly / fun
    "Dropped Nachos",
    "Spilled Beer",
    "Beach Ball in Stands",
    "Kiss Cam Couple",
    "Dancing Fan",
    "Backwards Cap",
    "Baby Crying",
    "Mascot Appearance",
    "Hot Dog Race",
    "Wave Started",
    "Someone Catches Foul Ball",
    "Fan Asleep",
    "Jersey of Wrong Team",
    "Sunburn Spotted",
    "Proposal on Jumbotron",
    // on the field
    "Home Run",
    "Strikeout",
    "Double Play",
    "Stolen Base",
    "Diving Catch",
    "Grand Slam",
    "Walk-off Hit",
    "Pitcher's Duel",
    "Arguing with Umpire",
    "Bat Flip",
    "Foul Ball",
    "Pitching Change",
    "Replay Review",
    "7th Inning Stretch",
    "Triple",
    // stadium
    "Fireworks",
    "Organist Playing",
    "T-Shirt Cannon",
    "Beer Vendor Yelling",
    "Scoreboard Malfunction",
    "Rain Delay",
    "Crowd Boos Call",
    "National Anthem",
    "First Pitch Ceremony",
    "Giveaway Item Spotted",
    "Crowd Chant",
    "Stadium Food Line",
    "Security Escort",
    "Ball Boy/Girl Catch",
    "PA Announcer Voice Crack",
];

const DEFAULT_EMOJI: &str = "⚾";

pub fn event_emoji(event: &str) -> &'static str {
    match event {
        "Dropped Nachos" => "🌮",
        "Spilled Beer" => "🍺",
        "Beach Ball in Stands" => "🏖️",
        "Kiss Cam Couple" => "💋",
        "Dancing Fan" => "💃",
        "Backwards Cap" => "🧢",
        "Baby Crying" => "👶",
        "Mascot Appearance" => "🐻",
        "Hot Dog Race" => "🌭",
        "Wave Started" => "🌊",
        "Someone Catches Foul Ball" => "🙌",
        "Fan Asleep" => "😴",
        "Jersey of Wrong Team" => "👕",
        "Sunburn Spotted" => "☀️",
        "Proposal on Jumbotron" => "💍",
        "Home Run" => "⚾",
        "Strikeout" => "❌",
        "Double Play" => "✌️",
        "Stolen Base" => "🏃",
        "Diving Catch" => "🤸",
        "Grand Slam" => "💥",
        "Walk-off Hit" => "🚶‍♂️",
        "Pitcher's Duel" => "🔥",
        "Arguing with Umpire" => "🗣️",
        "Bat Flip" => "🪵",
        "Foul Ball" => "⚾",
        "Pitching Change" => "🔄",
        "Replay Review" => "📺",
        "7th Inning Stretch" => "🎵",
        "Triple" => "3️⃣",
        "Fireworks" => "🎆",
        "Organist Playing" => "🎹",
        "T-Shirt Cannon" => "👕",
        "Beer Vendor Yelling" => "📣",
        "Scoreboard Malfunction" => "🛑",
        "Rain Delay" => "🌧️",
        "Crowd Boos Call" => "👎",
        "National Anthem" => "🦅",
        "First Pitch Ceremony" => "🎤",
        "Giveaway Item Spotted" => "🎁",
        "Crowd Chant" => "🗣️",
        "Stadium Food Line" => "🍔",
        "Security Escort" => "🚨",
        "Ball Boy/Girl Catch" => "🧤",
        "PA Announcer Voice Crack" => "🎙️",
        _ => DEFAULT_EMOJI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_no_duplicates() {
        let unique: HashSet<&str> = BINGO_EVENTS.iter().copied().collect();
        assert_eq!(unique.len(), BINGO_EVENTS.len());
        assert!(!unique.contains(FREE_SPACE));
    }

    #[test]
    fn test_unknown_event_falls_back() {
        assert_eq!(event_emoji("Bat Flip"), "🪵");
        assert_eq!(event_emoji("Seagull Invasion"), DEFAULT_EMOJI);
    }
}
