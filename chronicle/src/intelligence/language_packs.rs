//! Static phrase tables for the nine supported languages.
//!
//! Every entry is a lowercase regex fragment. Latin-script packs are matched
//! on Unicode word boundaries, CJK packs as plain substrings. Packs are never
//! selected by a declared language: callers evaluate all of them.

use serde::{Deserialize, Serialize};

use crate::models::DataType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
    Ja,
    Ko,
    Es,
    Fr,
    De,
    It,
    Pt,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Words are delimited; match on `\b`.
    Latin,
    /// No word delimiters; match anywhere.
    Cjk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgoUnit {
    Day,
    Week,
    Month,
}

pub struct TemporalPhrases {
    pub today: &'static [&'static str],
    pub yesterday: &'static [&'static str],
    pub this_week: &'static [&'static str],
    pub last_week: &'static [&'static str],
    pub this_month: &'static [&'static str],
    pub last_month: &'static [&'static str],
    /// Must capture `n` (digits) and `unit`.
    pub ago: &'static str,
    /// Exact lowercase `unit` captures and what they mean.
    pub ago_units: &'static [(&'static str, AgoUnit)],
}

pub struct LanguagePack {
    pub language: Language,
    pub script: Script,
    pub count: &'static [&'static str],
    pub aggregation: &'static [&'static str],
    pub average: &'static [&'static str],
    pub maximum: &'static [&'static str],
    pub minimum: &'static [&'static str],
    pub comparison: &'static [&'static str],
    pub pattern: &'static [&'static str],
    pub data_types: &'static [(DataType, &'static [&'static str])],
    /// Health metric field name and its phrases.
    pub metrics: &'static [(&'static str, &'static [&'static str])],
    /// Canonical activity tag and its phrases.
    pub activities: &'static [(&'static str, &'static [&'static str])],
    pub temporal: TemporalPhrases,
}

pub const PACKS: &[LanguagePack] = &[EN, ZH, JA, KO, ES, FR, DE, IT, PT];

const EN: LanguagePack = LanguagePack {
    language: Language::En,
    script: Script::Latin,
    count: &["how many", "number of", "count"],
    aggregation: &[
        "total", "in total", "sum", "average", "avg", "mean", "how much", "maximum", "max",
        "minimum", "min", "highest", "lowest", "longest", "shortest",
    ],
    average: &["average", "avg", "mean"],
    maximum: &["maximum", "max", "highest", "longest", "peak"],
    minimum: &["minimum", "min", "lowest", "shortest", "fewest"],
    comparison: &[
        "compare", "compared", "comparison", "vs", "versus", "more than", "less than",
        "fewer than", "than last", "difference",
    ],
    pattern: &[
        "usually", "typically", "normally", "tend to", "when do i", "what time", "which day",
        "what day", "how often", "pattern", "habit", "routine",
    ],
    data_types: &[
        (
            DataType::Voice,
            &[r"voice ?notes?", r"voice ?memos?", r"voice messages?", "voice", "recordings?", "recorded"],
        ),
        (DataType::Photo, &["photos?", "pictures?", "pics?", "images?", "selfies?", "snapshots?"]),
        (
            DataType::Health,
            &["steps?", r"heart ?rate", "sleep", "slept", "calories", "weight", "health", "walked"],
        ),
        (
            DataType::Location,
            &["visit(?:ed|s)?", "went to", "go to", "been to", "places?", "locations?", "where"],
        ),
        (DataType::Text, &["notes?", "journal", "diary", "wrote", "written", "memos?"]),
        (
            DataType::Event,
            &["events?", "meetings?", "calendar", "appointments?", "schedule", "scheduled"],
        ),
    ],
    metrics: &[
        ("steps", &["steps?", "walked", "walk(?:ing)?"]),
        ("heartRate", &[r"heart ?rate", "bpm", "pulse"]),
        ("sleepHours", &["sleep", "slept"]),
        ("calories", &["calories", "kcal"]),
        ("weight", &["weight", "weigh"]),
    ],
    activities: &[
        ("badminton", &["badminton"]),
        ("gym", &["gym", r"fitness cent(?:er|re)"]),
        ("tennis", &["tennis"]),
        ("yoga", &["yoga"]),
        ("swimming", &["swim(?:ming)?", "swam"]),
        ("basketball", &["basketball"]),
        ("soccer", &["soccer", "football"]),
        ("hiking", &["hike", "hiking", "hiked"]),
        ("golf", &["golf"]),
        ("climbing", &["climbing", "bouldering"]),
    ],
    temporal: TemporalPhrases {
        today: &["today", "tonight"],
        yesterday: &["yesterday", "last night"],
        this_week: &["this week"],
        last_week: &["last week", "previous week"],
        this_month: &["this month"],
        last_month: &["last month", "previous month"],
        ago: r"\b(?P<n>\d+)\s+(?P<unit>days?|weeks?|months?)\s+ago\b",
        ago_units: &[
            ("day", AgoUnit::Day),
            ("days", AgoUnit::Day),
            ("week", AgoUnit::Week),
            ("weeks", AgoUnit::Week),
            ("month", AgoUnit::Month),
            ("months", AgoUnit::Month),
        ],
    },
};

const ZH: LanguagePack = LanguagePack {
    language: Language::Zh,
    script: Script::Cjk,
    count: &[
        "多少次", "多少个", "多少條", "多少条", "多少张", "多少張", "几次", "几个", "几条", "几张",
        "几天", "幾次", "幾個", "幾條", "幾張",
    ],
    aggregation: &[
        "总共", "总计", "一共", "合计", "總共", "總計", "平均", "最多", "最高", "最低", "最少",
        "最长", "最短",
    ],
    average: &["平均"],
    maximum: &["最多", "最高", "最长", "最大"],
    minimum: &["最少", "最低", "最短", "最小"],
    comparison: &["比较", "比較", "相比", "对比", "對比", "比上", "多还是少", "差多少"],
    pattern: &[
        "通常", "一般", "经常", "經常", "平时", "平時", "什么时候", "什麼時候", "几点", "幾點",
        "哪天", "星期几", "规律", "規律", "习惯", "習慣",
    ],
    data_types: &[
        (DataType::Voice, &["语音", "語音", "录音", "錄音"]),
        (DataType::Photo, &["照片", "图片", "圖片", "相片", "自拍"]),
        (
            DataType::Health,
            &["步数", "步數", "多少步", "心率", "睡眠", "卡路里", "热量", "熱量", "体重", "體重", "健康"],
        ),
        (DataType::Location, &["去过", "去過", "去了", "地方", "地点", "地點", "位置", "哪里", "哪裡"]),
        (DataType::Text, &["笔记", "筆記", "日记", "日記", "备忘", "備忘"]),
        (
            DataType::Event,
            &["会议", "會議", "日程", "活动", "活動", "约会", "約會", "事件", "日历", "日曆"],
        ),
    ],
    metrics: &[
        ("steps", &["步"]),
        ("heartRate", &["心率", "心跳"]),
        ("sleepHours", &["睡眠", "睡了", "睡觉", "睡覺"]),
        ("calories", &["卡路里", "热量", "熱量", "大卡"]),
        ("weight", &["体重", "體重"]),
    ],
    activities: &[
        ("badminton", &["羽毛球"]),
        ("gym", &["健身房", "健身"]),
        ("tennis", &["网球", "網球"]),
        ("yoga", &["瑜伽"]),
        ("swimming", &["游泳"]),
        ("basketball", &["篮球", "籃球"]),
        ("soccer", &["足球"]),
        ("hiking", &["徒步", "爬山", "远足", "遠足"]),
        ("golf", &["高尔夫", "高爾夫"]),
        ("climbing", &["攀岩"]),
    ],
    temporal: TemporalPhrases {
        today: &["今天", "今日"],
        yesterday: &["昨天", "昨日"],
        this_week: &["这周", "这个?星期", "本周", "這週", "這個?星期", "本週", "这礼拜"],
        last_week: &["上周", "上个?星期", "上週", "上個?星期", "上礼拜"],
        this_month: &["这个月", "本月", "這個月"],
        last_month: &["上个月", "上個月", "上月"],
        ago: r"(?P<n>\d+)\s*(?P<unit>天|周|週|个?星期|個?星期|个?月|個月)前",
        ago_units: &[
            ("天", AgoUnit::Day),
            ("周", AgoUnit::Week),
            ("週", AgoUnit::Week),
            ("星期", AgoUnit::Week),
            ("个星期", AgoUnit::Week),
            ("個星期", AgoUnit::Week),
            ("月", AgoUnit::Month),
            ("个月", AgoUnit::Month),
            ("個月", AgoUnit::Month),
        ],
    },
};

const JA: LanguagePack = LanguagePack {
    language: Language::Ja,
    script: Script::Cjk,
    count: &["何回", "何件", "何枚", "何個", "何度", "いくつ", "何日"],
    aggregation: &["合計", "平均", "最大", "最小", "最高", "最低", "最長", "最短", "トータル"],
    average: &["平均"],
    maximum: &["最大", "最高", "最長"],
    minimum: &["最小", "最低", "最短"],
    comparison: &["比べ", "比較", "くらべ", "より多", "より少"],
    pattern: &["いつも", "普段", "ふだん", "たいてい", "何時", "何曜日", "パターン", "習慣", "傾向"],
    data_types: &[
        (DataType::Voice, &["音声", "ボイスメモ", "録音", "ボイス"]),
        (DataType::Photo, &["写真", "画像", "フォト", "自撮り"]),
        (DataType::Health, &["歩数", "歩い", "心拍", "睡眠", "寝た", "カロリー", "体重", "健康"]),
        (DataType::Location, &["行った", "訪れ", "訪問", "場所", "どこ"]),
        (DataType::Text, &["メモ", "日記", "ノート"]),
        (DataType::Event, &["予定", "会議", "イベント", "カレンダー", "約束", "ミーティング"]),
    ],
    metrics: &[
        ("steps", &["歩"]),
        ("heartRate", &["心拍"]),
        ("sleepHours", &["睡眠", "寝"]),
        ("calories", &["カロリー"]),
        ("weight", &["体重"]),
    ],
    activities: &[
        ("badminton", &["バドミントン"]),
        ("gym", &["ジム"]),
        ("tennis", &["テニス"]),
        ("yoga", &["ヨガ"]),
        ("swimming", &["水泳", "プール", "泳"]),
        ("basketball", &["バスケ"]),
        ("soccer", &["サッカー"]),
        ("hiking", &["ハイキング", "登山"]),
        ("golf", &["ゴルフ"]),
        ("climbing", &["ボルダリング", "クライミング"]),
    ],
    temporal: TemporalPhrases {
        today: &["今日", "きょう", "本日"],
        yesterday: &["昨日", "きのう"],
        this_week: &["今週"],
        last_week: &["先週"],
        this_month: &["今月"],
        last_month: &["先月"],
        ago: r"(?P<n>\d+)\s*(?P<unit>日|週間|週|か月|ヶ月|カ月)前",
        ago_units: &[
            ("日", AgoUnit::Day),
            ("週間", AgoUnit::Week),
            ("週", AgoUnit::Week),
            ("か月", AgoUnit::Month),
            ("ヶ月", AgoUnit::Month),
            ("カ月", AgoUnit::Month),
        ],
    },
};

const KO: LanguagePack = LanguagePack {
    language: Language::Ko,
    script: Script::Cjk,
    count: &[r"몇\s*번", r"몇\s*개", r"몇\s*장", r"몇\s*회", r"몇\s*건", r"몇\s*일", r"몇\s*곳", "횟수"],
    aggregation: &["총", "합계", "평균", "최대", "최소", "최고", "최저", "전체"],
    average: &["평균"],
    maximum: &["최대", "최고", r"가장\s*많"],
    minimum: &["최소", "최저", r"가장\s*적"],
    comparison: &["비교", "보다", "대비", "차이"],
    pattern: &["보통", "주로", "대개", "언제", r"몇\s*시", r"무슨\s*요일", "패턴", "습관"],
    data_types: &[
        (DataType::Voice, &["음성", "녹음", "보이스"]),
        (DataType::Photo, &["사진", "이미지", "셀카"]),
        (DataType::Health, &["걸음", "심박", "수면", "칼로리", "체중", "몸무게", "건강"]),
        (DataType::Location, &["갔", "방문", "장소", "위치", "어디"]),
        (DataType::Text, &["메모", "일기", "노트"]),
        (DataType::Event, &["일정", "회의", "이벤트", "약속", "캘린더", "미팅"]),
    ],
    metrics: &[
        ("steps", &["걸음"]),
        ("heartRate", &["심박"]),
        ("sleepHours", &["수면", "잠"]),
        ("calories", &["칼로리"]),
        ("weight", &["체중", "몸무게"]),
    ],
    activities: &[
        ("badminton", &["배드민턴"]),
        ("gym", &["헬스장", "헬스", "체육관"]),
        ("tennis", &["테니스"]),
        ("yoga", &["요가"]),
        ("swimming", &["수영"]),
        ("basketball", &["농구"]),
        ("soccer", &["축구"]),
        ("hiking", &["등산", "하이킹"]),
        ("golf", &["골프"]),
        ("climbing", &["클라이밍"]),
    ],
    temporal: TemporalPhrases {
        today: &["오늘"],
        yesterday: &["어제"],
        this_week: &[r"이번\s*주"],
        last_week: &[r"지난\s*주", r"저번\s*주"],
        this_month: &[r"이번\s*달"],
        last_month: &[r"지난\s*달", r"저번\s*달"],
        ago: r"(?P<n>\d+)\s*(?P<unit>일|주일|주|개월|달)\s*전",
        ago_units: &[
            ("일", AgoUnit::Day),
            ("주", AgoUnit::Week),
            ("주일", AgoUnit::Week),
            ("개월", AgoUnit::Month),
            ("달", AgoUnit::Month),
        ],
    },
};

const ES: LanguagePack = LanguagePack {
    language: Language::Es,
    script: Script::Latin,
    count: &["cuántos", "cuántas", "cuantos", "cuantas", "número de", "cantidad de"],
    aggregation: &[
        "total", "en total", "suma", "promedio", "media", "máximo", "mínimo", "maximo", "minimo",
    ],
    average: &["promedio", "media"],
    maximum: &["máximo", "maximo", "más alto"],
    minimum: &["mínimo", "minimo", "más bajo"],
    comparison: &[
        "comparar", "compara", "comparado", "comparación", "más que", "menos que", "frente a",
        "diferencia",
    ],
    pattern: &[
        "normalmente", "usualmente", "habitualmente", "suelo", "sueles", "a qué hora", "qué día",
        "patrón", "hábito", "con qué frecuencia",
    ],
    data_types: &[
        (DataType::Voice, &["notas? de voz", "grabaci(?:ón|ones)", "grabé", "audios?"]),
        (DataType::Photo, &["fotos?", "imágenes", "imagen", "selfies?"]),
        (
            DataType::Health,
            &["pasos", "ritmo cardíaco", "frecuencia cardíaca", "sueño", "dormí", "calorías", "peso", "salud"],
        ),
        (
            DataType::Location,
            &["visité", "fui a", "fuimos a", "lugar(?:es)?", "ubicaci(?:ón|ones)", "dónde"],
        ),
        (DataType::Text, &["notas?", "diario", "escribí", "apuntes"]),
        (DataType::Event, &["eventos?", "reuni(?:ón|ones)", "calendario", "citas?", "agenda"]),
    ],
    metrics: &[
        ("steps", &["pasos"]),
        ("heartRate", &["ritmo cardíaco", "frecuencia cardíaca", "pulso"]),
        ("sleepHours", &["sueño", "dormí", "dormir"]),
        ("calories", &["calorías"]),
        ("weight", &["peso"]),
    ],
    activities: &[
        ("badminton", &["bádminton", "badminton"]),
        ("gym", &["gimnasio", "gym"]),
        ("tennis", &["tenis"]),
        ("yoga", &["yoga"]),
        ("swimming", &["natación", "nadar", "nadé", "piscina"]),
        ("basketball", &["baloncesto", "básquet"]),
        ("soccer", &["fútbol"]),
        ("hiking", &["senderismo"]),
        ("golf", &["golf"]),
        ("climbing", &["escalada"]),
    ],
    temporal: TemporalPhrases {
        today: &["hoy"],
        yesterday: &["ayer", "anoche"],
        this_week: &["esta semana"],
        last_week: &["semana pasada"],
        this_month: &["este mes"],
        last_month: &["mes pasado"],
        ago: r"\bhace\s+(?P<n>\d+)\s+(?P<unit>días?|dias?|semanas?|mes|meses)\b",
        ago_units: &[
            ("día", AgoUnit::Day),
            ("días", AgoUnit::Day),
            ("dia", AgoUnit::Day),
            ("dias", AgoUnit::Day),
            ("semana", AgoUnit::Week),
            ("semanas", AgoUnit::Week),
            ("mes", AgoUnit::Month),
            ("meses", AgoUnit::Month),
        ],
    },
};

const FR: LanguagePack = LanguagePack {
    language: Language::Fr,
    script: Script::Latin,
    count: &["combien", "nombre de"],
    aggregation: &["total", "au total", "somme", "moyenne", "maximum", "minimum", "en tout"],
    average: &["moyenne"],
    maximum: &["maximum", "le plus"],
    minimum: &["minimum", "le moins"],
    comparison: &[
        "comparer", "compar(?:é|e|ée|és)", "comparaison", "par rapport", "plus que", "moins que",
        "différence",
    ],
    pattern: &[
        "d'habitude", "d’habitude", "habituellement", "généralement", "en général",
        "à quelle heure", "quel jour", "tendance", "habitude",
    ],
    data_types: &[
        (
            DataType::Voice,
            &["notes? vocales?", "mémos? vocaux", "mémo vocal", "enregistrements?", "enregistré"],
        ),
        (DataType::Photo, &["photos?", "images?", "selfies?"]),
        (
            DataType::Health,
            &["nombre de pas", "fréquence cardiaque", "sommeil", "dormi", "calories", "poids", "santé"],
        ),
        (DataType::Location, &["visité", "allée?", "lieux?", "endroits?", "où"]),
        (DataType::Text, &["notes?", "journal", "écrit", "carnet"]),
        (
            DataType::Event,
            &["événements?", "réunions?", "calendrier", "rendez-vous", "agenda"],
        ),
    ],
    metrics: &[
        ("steps", &["pas"]),
        ("heartRate", &["fréquence cardiaque", "pouls"]),
        ("sleepHours", &["sommeil", "dormi"]),
        ("calories", &["calories"]),
        ("weight", &["poids"]),
    ],
    activities: &[
        ("badminton", &["badminton"]),
        ("gym", &["salle de sport", "salle de gym", "gym"]),
        ("tennis", &["tennis"]),
        ("yoga", &["yoga"]),
        ("swimming", &["natation", "nager", "piscine"]),
        ("basketball", &["basket(?:-ball)?"]),
        ("soccer", &["foot(?:ball)?"]),
        ("hiking", &["randonnée"]),
        ("golf", &["golf"]),
        ("climbing", &["escalade"]),
    ],
    temporal: TemporalPhrases {
        today: &["aujourd'hui", "aujourd’hui"],
        yesterday: &["hier"],
        this_week: &["cette semaine"],
        last_week: &["la semaine dernière", "la semaine derniere", "semaine passée"],
        this_month: &["ce mois(?:-ci)?"],
        last_month: &["le mois dernier", "mois passé"],
        ago: r"\bil y a\s+(?P<n>\d+)\s+(?P<unit>jours?|semaines?|mois)\b",
        ago_units: &[
            ("jour", AgoUnit::Day),
            ("jours", AgoUnit::Day),
            ("semaine", AgoUnit::Week),
            ("semaines", AgoUnit::Week),
            ("mois", AgoUnit::Month),
        ],
    },
};

const DE: LanguagePack = LanguagePack {
    language: Language::De,
    script: Script::Latin,
    count: &["wie viele", "wieviele", "anzahl"],
    aggregation: &[
        "insgesamt", "gesamt", "summe", "durchschnitt", "durchschnittlich", "maximal", "minimal",
        "maximum", "minimum", "höchste[nrs]?", "niedrigste[nrs]?",
    ],
    average: &["durchschnitt", "durchschnittlich", "mittel"],
    maximum: &["maximal", "maximum", "höchste[nrs]?", "meiste[nrs]?"],
    minimum: &["minimal", "minimum", "niedrigste[nrs]?", "wenigste[nrs]?"],
    comparison: &[
        "vergleich(?:en)?", "verglichen", "im vergleich", "mehr als", "weniger als", "unterschied",
        "gegenüber",
    ],
    pattern: &[
        "normalerweise", "gewöhnlich", "meistens", "üblicherweise", "um wie viel uhr", "wann",
        "an welchem tag", "welchen tag", "muster", "gewohnheit", "wie oft",
    ],
    data_types: &[
        (
            DataType::Voice,
            &["sprachnotiz(?:en)?", "sprachmemos?", "sprachnachrichten?", "aufnahmen?", "aufgenommen"],
        ),
        (DataType::Photo, &["fotos?", "bilder", "bild", "selfies?"]),
        (
            DataType::Health,
            &["schritte", "herzfrequenz", "puls", "schlaf", "geschlafen", "kalorien", "gewicht", "gesundheit"],
        ),
        (DataType::Location, &["besucht", "war ich", "orte?", "wo"]),
        (DataType::Text, &["notiz(?:en)?", "tagebuch", "geschrieben"]),
        (
            DataType::Event,
            &["termine?", "meetings?", "besprechung(?:en)?", "kalender", "veranstaltung(?:en)?", "ereignis(?:se)?"],
        ),
    ],
    metrics: &[
        ("steps", &["schritte"]),
        ("heartRate", &["herzfrequenz", "puls"]),
        ("sleepHours", &["schlaf", "geschlafen"]),
        ("calories", &["kalorien"]),
        ("weight", &["gewicht"]),
    ],
    activities: &[
        ("badminton", &["badminton"]),
        ("gym", &["fitnessstudio", "gym"]),
        ("tennis", &["tennis"]),
        ("yoga", &["yoga"]),
        ("swimming", &["schwimmen", "geschwommen", "schwimmbad"]),
        ("basketball", &["basketball"]),
        ("soccer", &["fußball", "fussball"]),
        ("hiking", &["wandern", "gewandert", "wanderung"]),
        ("golf", &["golf"]),
        ("climbing", &["klettern", "bouldern"]),
    ],
    temporal: TemporalPhrases {
        today: &["heute"],
        yesterday: &["gestern"],
        this_week: &["diese woche", "dieser woche"],
        last_week: &["letzte woche", "letzten woche", "vergangene woche", "vorige woche"],
        this_month: &["diesen monat", "diesem monat", "dieser monat"],
        last_month: &["letzten monat", "letzter monat", "vorigen monat", "vergangenen monat"],
        ago: r"\bvor\s+(?P<n>\d+)\s+(?P<unit>tagen|tag|wochen|woche|monaten|monat)\b",
        ago_units: &[
            ("tag", AgoUnit::Day),
            ("tagen", AgoUnit::Day),
            ("woche", AgoUnit::Week),
            ("wochen", AgoUnit::Week),
            ("monat", AgoUnit::Month),
            ("monaten", AgoUnit::Month),
        ],
    },
};

const IT: LanguagePack = LanguagePack {
    language: Language::It,
    script: Script::Latin,
    count: &["quanti", "quante", "numero di"],
    aggregation: &["totale", "in totale", "somma", "media", "massimo", "minimo"],
    average: &["media"],
    maximum: &["massimo", "più alto"],
    minimum: &["minimo", "più basso"],
    comparison: &[
        "confronto", "confronta(?:re|to)?", "rispetto a", "più di", "meno di", "differenza",
    ],
    pattern: &[
        "di solito", "solitamente", "normalmente", "abitualmente", "a che ora", "quale giorno",
        "che giorno", "abitudine", "tendenza",
    ],
    data_types: &[
        (
            DataType::Voice,
            &["note vocali", "nota vocale", "memo vocal[ei]", "registrazion[ei]", "registrato"],
        ),
        (DataType::Photo, &["foto", "immagin[ei]", "selfie"]),
        (
            DataType::Health,
            &["passi", "battito", "frequenza cardiaca", "sonno", "dormito", "calorie", "peso", "salute"],
        ),
        (
            DataType::Location,
            &["visitato", "sono andat[oa]", "luogh?i", "luogo", "posti", "posto", "dove"],
        ),
        (DataType::Text, &["note", "appunti", "diario", "scritto"]),
        (
            DataType::Event,
            &["eventi", "evento", "riunion[ei]", "calendario", "appuntament[oi]", "impegni"],
        ),
    ],
    metrics: &[
        ("steps", &["passi"]),
        ("heartRate", &["battito", "frequenza cardiaca"]),
        ("sleepHours", &["sonno", "dormito"]),
        ("calories", &["calorie"]),
        ("weight", &["peso"]),
    ],
    activities: &[
        ("badminton", &["badminton"]),
        ("gym", &["palestra"]),
        ("tennis", &["tennis"]),
        ("yoga", &["yoga"]),
        ("swimming", &["nuoto", "nuotare", "piscina"]),
        ("basketball", &["pallacanestro", "basket"]),
        ("soccer", &["calcio"]),
        ("hiking", &["escursion[ei]", "trekking"]),
        ("golf", &["golf"]),
        ("climbing", &["arrampicata"]),
    ],
    temporal: TemporalPhrases {
        today: &["oggi"],
        yesterday: &["ieri"],
        this_week: &["questa settimana"],
        last_week: &["settimana scorsa", "scorsa settimana"],
        this_month: &["questo mese"],
        last_month: &["mese scorso", "scorso mese"],
        ago: r"\b(?P<n>\d+)\s+(?P<unit>giorni|giorno|settimane|settimana|mesi|mese)\s+fa\b",
        ago_units: &[
            ("giorno", AgoUnit::Day),
            ("giorni", AgoUnit::Day),
            ("settimana", AgoUnit::Week),
            ("settimane", AgoUnit::Week),
            ("mese", AgoUnit::Month),
            ("mesi", AgoUnit::Month),
        ],
    },
};

const PT: LanguagePack = LanguagePack {
    language: Language::Pt,
    script: Script::Latin,
    count: &["quantos", "quantas", "número de"],
    aggregation: &["total", "no total", "soma", "média", "máximo", "mínimo"],
    average: &["média"],
    maximum: &["máximo", "mais alto"],
    minimum: &["mínimo", "mais baixo"],
    comparison: &[
        "comparar", "comparado", "comparação", "em relação", "mais que", "menos que", "diferença",
    ],
    pattern: &[
        "normalmente", "geralmente", "costumo", "costuma", "a que horas", "que dia", "padrão",
        "hábito", "com que frequência",
    ],
    data_types: &[
        (DataType::Voice, &["notas? de voz", "gravaç(?:ão|ões)", "gravei", "áudios?"]),
        (DataType::Photo, &["fotos?", "imagens?", "selfies?"]),
        (
            DataType::Health,
            &["passos", "frequência cardíaca", "batimentos", "sono", "dormi", "calorias", "peso", "saúde"],
        ),
        (
            DataType::Location,
            &["visitei", "fui (?:a|ao|à)", "lugar(?:es)?", "locais", "local", "onde"],
        ),
        (DataType::Text, &["notas?", "diário", "anotaç(?:ão|ões)", "escrevi"]),
        (
            DataType::Event,
            &["eventos?", "reuni(?:ão|ões)", "calendário", "compromissos?", "agenda"],
        ),
    ],
    metrics: &[
        ("steps", &["passos"]),
        ("heartRate", &["frequência cardíaca", "batimentos"]),
        ("sleepHours", &["sono", "dormi"]),
        ("calories", &["calorias"]),
        ("weight", &["peso"]),
    ],
    activities: &[
        ("badminton", &["badminton"]),
        ("gym", &["academia", "ginásio"]),
        ("tennis", &["tênis", "ténis"]),
        ("yoga", &["ioga", "yoga"]),
        ("swimming", &["natação", "nadar", "piscina"]),
        ("basketball", &["basquete"]),
        ("soccer", &["futebol"]),
        ("hiking", &["trilha"]),
        ("golf", &["golfe"]),
        ("climbing", &["escalada"]),
    ],
    temporal: TemporalPhrases {
        today: &["hoje"],
        yesterday: &["ontem"],
        this_week: &["esta semana", "nesta semana"],
        last_week: &["semana passada"],
        this_month: &["este mês", "neste mês"],
        last_month: &["mês passado"],
        ago: r"\bhá\s+(?P<n>\d+)\s+(?P<unit>dias?|semanas?|mês|meses)\b",
        ago_units: &[
            ("dia", AgoUnit::Day),
            ("dias", AgoUnit::Day),
            ("semana", AgoUnit::Week),
            ("semanas", AgoUnit::Week),
            ("mês", AgoUnit::Month),
            ("meses", AgoUnit::Month),
        ],
    },
};

/// Compile a phrase list into one case-insensitive alternation.
///
/// Returns `None` for an empty list or a malformed fragment; the latter is
/// logged so a broken table entry degrades one rule instead of the whole pack.
pub(crate) fn compile_phrases(script: Script, phrases: &[&str]) -> Option<regex::Regex> {
    if phrases.is_empty() {
        return None;
    }
    let alternation = phrases.join("|");
    let pattern = match script {
        Script::Latin => format!(r"(?i)\b(?:{alternation})\b"),
        Script::Cjk => format!(r"(?i)(?:{alternation})"),
    };
    match regex::Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern = %pattern, error = %e, "Invalid phrase table entry");
            None
        }
    }
}
