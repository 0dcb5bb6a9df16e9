#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerTime {
    pub name: &'static str,
    pub time: &'static str,
}

// Published sample timetable. The site displays times, it does not compute
// them from solar positions.
pub const SAMPLE_TIMETABLE: [PrayerTime; 7] = [
    PrayerTime {
        name: "Fajr",
        time: "05:30",
    },
    PrayerTime {
        name: "Sunrise",
        time: "06:58",
    },
    PrayerTime {
        name: "Dhuhr",
        time: "13:15",
    },
    PrayerTime {
        name: "Asr",
        time: "16:45",
    },
    PrayerTime {
        name: "Maghrib",
        time: "19:32",
    },
    PrayerTime {
        name: "Isha",
        time: "21:00",
    },
    PrayerTime {
        name: "Jumu'ah",
        time: "13:30",
    },
];
