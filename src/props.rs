use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use comfy_table::Table;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::slip::{Pick, Side};

/// A single player stat line, e.g. "Player X - Points: 20.5".
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prop {
    pub player: String,
    pub stat: String,
    pub line: String,
}

impl Prop {
    pub fn new(player: impl Into<String>, stat: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            stat: stat.into(),
            line: line.into(),
        }
    }

    /// Whether both props describe the same line for the same player.
    pub fn same_line(&self, other: &Prop) -> bool {
        self.player == other.player && self.stat == other.stat && self.line == other.line
    }
}

// the feed is either already formatted ({player, stat, value})
// or the raw scrape ({full_name, stat_name, stat_value}), and lines can be numbers
#[derive(Deserialize)]
struct PropRaw {
    #[serde(alias = "full_name")]
    player: Option<String>,
    #[serde(alias = "stat_name")]
    stat: Option<String>,
    stat_value: Option<LineValue>,
    line: Option<LineValue>,
    value: Option<LineValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineValue {
    Number(f64),
    Text(String),
}

impl LineValue {
    fn into_text(self) -> Option<String> {
        match self {
            LineValue::Number(n) if n.is_finite() => Some(n.to_string()),
            LineValue::Number(_) => None,
            LineValue::Text(s) if s.trim().is_empty() => None,
            LineValue::Text(s) => Some(s.trim().to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Prop {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = PropRaw::deserialize(deserializer)?;

        let line = [raw.stat_value, raw.line, raw.value]
            .into_iter()
            .flatten()
            .find_map(LineValue::into_text)
            .unwrap_or_else(|| "N/A".to_string());

        Ok(Prop {
            player: raw.player.unwrap_or_default().trim().to_string(),
            stat: raw.stat.unwrap_or_else(|| "Stat".to_string()),
            line,
        })
    }
}

fn same_line_value(line: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();

    match (line.parse::<f64>(), wanted.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => line.eq_ignore_ascii_case(wanted),
    }
}

/// All props currently on offer.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct PropBoard {
    props: Vec<Prop>,
}

impl PropBoard {
    pub fn new(props: Vec<Prop>) -> Self {
        Self { props }
    }

    /// Creates a PropBoard from a JSON array of props.
    pub fn from_json(json: &str) -> Result<Self> {
        let props: Vec<Prop> = serde_json::from_str(json)?;
        debug!(count = props.len(), "loaded props");
        Ok(Self { props })
    }

    /// Creates a PropBoard from CSV with a header row, e.g. the scraper's
    /// `full_name,stat_name,stat_value,...` export. Unknown columns are ignored.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self> {
        let props = csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<std::result::Result<Vec<Prop>, _>>()?;
        debug!(count = props.len(), "loaded props");
        Ok(Self { props })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_csv_reader(file)
    }

    /// Creates a PropBoard from a file on disk.
    /// `.csv` files are read as CSV, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            return Self::from_csv_path(path);
        }

        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Unique player names, sorted. Props without a player are skipped.
    pub fn players(&self) -> Vec<&str> {
        self.props
            .iter()
            .map(|p| p.player.as_str())
            .filter(|name| !name.is_empty())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Props whose player name contains `query`, ignoring case.
    pub fn find_player_props(&self, query: &str) -> Vec<&Prop> {
        let query = query.to_lowercase();

        self.props
            .iter()
            .filter(|p| p.player.to_lowercase().contains(&query))
            .collect()
    }

    /// Resolves a player from either a 1-based number into `players()`, or a name fragment.
    /// An exact name (ignoring case) wins over fragments that match several players.
    pub fn select_player(&self, input: &str) -> Result<&str> {
        let input = input.trim();
        let players = self.players();

        if let Ok(number) = input.parse::<usize>() {
            if let Some(name) = number.checked_sub(1).and_then(|i| players.get(i)) {
                return Ok(*name);
            }
        }

        let query = input.to_lowercase();

        if let Some(exact) = players.iter().find(|p| p.to_lowercase() == query) {
            return Ok(*exact);
        }

        let matches: Vec<&str> = players
            .into_iter()
            .filter(|p| p.to_lowercase().contains(&query))
            .collect();

        match matches.as_slice() {
            [] => Err(Error::PlayerNotFound(input.to_string())),
            [single] => Ok(*single),
            _ => Err(Error::AmbiguousPlayer {
                query: input.to_string(),
                candidates: matches.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Finds the prop for `player` (resolved with `select_player`) whose stat matches `stat`, ignoring case.
    /// With alternate lines on the board this is the first one listed, see [`PropBoard::find_prop_line`].
    pub fn find_prop(&self, player: &str, stat: &str) -> Result<&Prop> {
        self.find_prop_line(player, stat, None)
    }

    /// Like [`PropBoard::find_prop`], but only accepts a prop on `line` when one is given.
    /// Numeric lines compare by value, so "7.5" matches "7.50".
    pub fn find_prop_line(&self, player: &str, stat: &str, line: Option<&str>) -> Result<&Prop> {
        let player = self.select_player(player)?;
        let stat = stat.trim();

        self.props
            .iter()
            .filter(|p| p.player == player && p.stat.eq_ignore_ascii_case(stat))
            .find(|p| line.map_or(true, |line| same_line_value(&p.line, line)))
            .ok_or_else(|| Error::PropNotFound {
                player: player.to_string(),
                stat: match line {
                    Some(line) => format!("{stat} {}", line.trim()),
                    None => stat.to_string(),
                },
            })
    }

    /// Parses a pick written as `player|stat|side` or `player|stat|line|side`.
    ///
    /// ```
    /// use pickem::props::{Prop, PropBoard};
    /// use pickem::slip::Side;
    ///
    /// let board = PropBoard::new(vec![
    ///     Prop::new("Stephen Curry", "Points", "27.5"),
    ///     Prop::new("Stephen Curry", "Points", "30.5"),
    /// ]);
    ///
    /// assert_eq!(board.parse_pick("curry|points|under").unwrap().prop.line, "27.5");
    ///
    /// let pick = board.parse_pick("curry|points|30.5|over").unwrap();
    /// assert_eq!(pick.prop.line, "30.5");
    /// assert_eq!(pick.side, Side::Over);
    /// ```
    pub fn parse_pick(&self, input: &str) -> Result<Pick> {
        let (player, stat, line, side) = match input.split('|').collect::<Vec<_>>()[..] {
            [player, stat, side] => (player, stat, None, side),
            [player, stat, line, side] => (player, stat, Some(line), side),
            _ => return Err(Error::MalformedPick(input.to_string())),
        };

        let side: Side = side.parse()?;
        let prop = self.find_prop_line(player, stat, line)?;

        Ok(Pick::new(prop.clone(), side))
    }

    /// Returns a table visualization of the given props
    pub fn table_of<'a>(props: impl IntoIterator<Item = &'a Prop>) -> String {
        let mut table = Table::new();

        table.set_header(vec!["#", "Player", "Stat", "Line"]);

        for (index, prop) in props.into_iter().enumerate() {
            table.add_row(vec![
                (index + 1).to_string(),
                prop.player.clone(),
                prop.stat.clone(),
                prop.line.clone(),
            ]);
        }

        table.to_string()
    }

    /// Returns a table visualization of the whole board
    pub fn table(&self) -> String {
        Self::table_of(&self.props)
    }
}
