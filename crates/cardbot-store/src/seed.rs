//! Bundled starter cards, loaded on first run only.

use cardbot_core::domain::{Card, DayKey};

fn card(
    day: &str,
    title: &str,
    message: &str,
    media_url: &str,
    holiday_name: Option<&str>,
) -> Card {
    Card {
        day_key: day.parse::<DayKey>().expect("seed day key is valid"),
        title: title.to_string(),
        message: message.to_string(),
        media_url: media_url.to_string(),
        is_holiday: holiday_name.is_some(),
        holiday_name: holiday_name.map(|s| s.to_string()),
    }
}

/// The starter dataset: the big holidays plus a spread of everyday
/// good-morning cards across the year.
pub fn starter_cards() -> Vec<Card> {
    vec![
        card(
            "01-01",
            "Happy New Year!",
            "May the new year bring happiness, health and good fortune to your home!",
            "https://i.pinimg.com/originals/29/86/e3/2986e3c70f2cdf2b3a7b88e583e4a03e.jpg",
            Some("New Year"),
        ),
        card(
            "01-07",
            "Merry Christmas!",
            "A bright Christmas to you! May your home be warm and cozy!",
            "https://i.pinimg.com/originals/53/a8/f1/53a8f160d7d4ddf74c6e5cd9c0a8dd2e.jpg",
            Some("Christmas"),
        ),
        card(
            "02-14",
            "Happy Valentine's Day!",
            "Love, tenderness and warm feelings!",
            "https://i.pinimg.com/originals/e0/8e/1d/e08e1d0c5c8f3c38a2c5c3a1e1f4a6b3.jpg",
            Some("Valentine's Day"),
        ),
        card(
            "03-08",
            "Happy International Women's Day!",
            "Beauty, joy and a spring mood!",
            "https://i.pinimg.com/originals/7d/45/97/7d45975b8f0f3c38a2c5c3a1e1f4a6b3.jpg",
            Some("March 8"),
        ),
        card(
            "05-01",
            "Happy Spring and Labour Day!",
            "A good rest and a fine spring mood!",
            "https://i.pinimg.com/originals/1a/2b/3c/1a2b3c4d5e6f.jpg",
            Some("May Day"),
        ),
        card(
            "05-09",
            "Happy Victory Day!",
            "Peace, kindness and bright memory to the heroes!",
            "https://i.pinimg.com/originals/a5/b6/c7/a5b6c7d8e9f0.jpg",
            Some("Victory Day"),
        ),
        card(
            "01-15",
            "Good morning!",
            "May this day bring you joy and luck!",
            "https://i.pinimg.com/originals/bf/65/71/bf6571d0fc24c2a8feb4d0b4a1a6ce07.jpg",
            None,
        ),
        card(
            "02-10",
            "Have a good day!",
            "Wishing you warmth, comfort and a fine mood!",
            "https://i.pinimg.com/originals/c1/d2/e3/c1d2e3f4a5b6.jpg",
            None,
        ),
        card(
            "04-20",
            "Have a wonderful day!",
            "May every moment be filled with joy!",
            "https://i.pinimg.com/originals/i3/j4/k5/i3j4k5l6m7n8.jpg",
            None,
        ),
        card(
            "07-15",
            "Have a lovely day!",
            "May summer bring you bright impressions!",
            "https://i.pinimg.com/originals/e1/f2/g3/e1f2g3h4i5j6.jpg",
            None,
        ),
        card(
            "09-15",
            "Good morning!",
            "May autumn bring warmth and comfort!",
            "https://i.pinimg.com/originals/k3/l4/m5/k3l4m5n6o7p8.jpg",
            None,
        ),
        card(
            "10-26",
            "Good morning!",
            "Wishing you strong health and good spirits, and may every ordinary day bring only joy!",
            "https://i.pinimg.com/originals/bf/65/71/bf6571d0fc24c2a8feb4d0b4a1a6ce07.jpg",
            None,
        ),
        card(
            "12-20",
            "Have a lovely day!",
            "Wishing you a magical mood and joy!",
            "https://i.pinimg.com/originals/g1/h2/i3/g1h2i3j4k5l6.jpg",
            None,
        ),
    ]
}
