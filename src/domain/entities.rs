//! Domain entities: node payload and its validated value types

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Point on the layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `X,Y` (whitespace around either coordinate is ignored).
impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPosition(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
        let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
        let position = Self::new(x, y);
        if !position.is_finite() {
            return Err(invalid());
        }
        Ok(position)
    }
}

/// Display emphasis of a node.
///
/// Persisted as one of three literal tags: `"{}"` (urgent), `"[]"` (medium)
/// and `"()"` (low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Urgent,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub const URGENT_TAG: &'static str = "{}";
    pub const MEDIUM_TAG: &'static str = "[]";
    pub const LOW_TAG: &'static str = "()";

    pub fn tag(self) -> &'static str {
        match self {
            Priority::Urgent => Self::URGENT_TAG,
            Priority::Medium => Self::MEDIUM_TAG,
            Priority::Low => Self::LOW_TAG,
        }
    }

    /// Strict lookup by persisted tag.
    pub fn from_tag(tag: &str) -> Result<Self, DomainError> {
        match tag {
            Self::URGENT_TAG => Ok(Priority::Urgent),
            Self::MEDIUM_TAG => Ok(Priority::Medium),
            Self::LOW_TAG => Ok(Priority::Low),
            other => Err(DomainError::UnknownPriority(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Accepts the persisted tags as well as the names `urgent`, `medium`, `low`.
impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Self::from_tag(trimmed).map_err(|_| DomainError::UnknownPriority(s.to_string())),
        }
    }
}

/// Completion percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Progress(u8);

impl Progress {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DomainError::ProgressOutOfRange(value))
        }
    }

    /// Saturating constructor for slider-style input.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Non-empty display title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Rejects empty and whitespace-only input; the text is otherwise kept as given.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload carried by every node of the tree.
///
/// Structural links (parent, children) live in the arena, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub title: Title,
    pub position: Position,
    pub priority: Priority,
    pub progress: Progress,
    pub text: String,
    pub people: Vec<String>,
    pub comments: Vec<String>,
    /// Opaque file references; existence is checked only when opening.
    pub files: Vec<String>,
}

impl NodeData {
    pub fn new(title: Title, position: Position) -> Self {
        Self {
            title,
            position,
            priority: Priority::default(),
            progress: Progress::default(),
            text: String::new(),
            people: Vec::new(),
            comments: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn builder(title: impl Into<String>) -> NodeDataBuilder {
        NodeDataBuilder::new(title)
    }

    /// Apply an editor form submission.
    ///
    /// All fields are validated before any of them is written, so a rejected
    /// edit leaves the node unchanged.
    pub fn apply(&mut self, edit: NodeEdit) -> Result<(), DomainError> {
        let title = edit.title.map(Title::new).transpose()?;
        let progress = edit.progress.map(Progress::new).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(progress) = progress {
            self.progress = progress;
        }
        if let Some(text) = edit.text {
            self.text = text.trim().to_string();
        }
        if let Some(people) = edit.people {
            self.people = people;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        Ok(())
    }
}

/// Validating factory for [`NodeData`].
///
/// Raw values are collected as given and checked once in [`NodeDataBuilder::build`].
#[derive(Debug, Clone)]
pub struct NodeDataBuilder {
    title: String,
    position: Position,
    priority: Priority,
    progress: i64,
    text: String,
    people: Vec<String>,
    comments: Vec<String>,
    files: Vec<String>,
}

impl NodeDataBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            position: Position::default(),
            priority: Priority::default(),
            progress: 0,
            text: String::new(),
            people: Vec::new(),
            comments: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn progress(mut self, progress: i64) -> Self {
        self.progress = progress;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn people(mut self, people: Vec<String>) -> Self {
        self.people = people;
        self
    }

    pub fn comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn build(self) -> Result<NodeData, DomainError> {
        Ok(NodeData {
            title: Title::new(self.title)?,
            position: self.position,
            priority: self.priority,
            progress: Progress::new(self.progress)?,
            text: self.text,
            people: self.people,
            comments: self.comments,
            files: self.files,
        })
    }
}

/// Fields submitted from the node editor; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeEdit {
    pub title: Option<String>,
    pub text: Option<String>,
    pub people: Option<Vec<String>>,
    pub progress: Option<i64>,
    pub priority: Option<Priority>,
}

impl NodeEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.people.is_none()
            && self.progress.is_none()
            && self.priority.is_none()
    }
}

/// Split a comma separated list of names, dropping blanks.
pub fn parse_people(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{}", Priority::Urgent)]
    #[case("[]", Priority::Medium)]
    #[case("()", Priority::Low)]
    fn given_persisted_tag_when_parsing_then_maps_to_priority(
        #[case] tag: &str,
        #[case] expected: Priority,
    ) {
        assert_eq!(Priority::from_tag(tag).unwrap(), expected);
        assert_eq!(expected.tag(), tag);
    }

    #[rstest]
    #[case("urgent", Priority::Urgent)]
    #[case("Medium", Priority::Medium)]
    #[case(" LOW ", Priority::Low)]
    #[case("{}", Priority::Urgent)]
    fn given_name_or_tag_when_from_str_then_accepts(#[case] input: &str, #[case] expected: Priority) {
        assert_eq!(input.parse::<Priority>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_tag_when_parsing_then_rejects() {
        assert_eq!(
            Priority::from_tag("<>"),
            Err(DomainError::UnknownPriority("<>".to_string()))
        );
        assert!("high".parse::<Priority>().is_err());
    }

    #[test]
    fn given_default_priority_then_low() {
        assert_eq!(Priority::default(), Priority::Low);
    }

    #[rstest]
    #[case(0)]
    #[case(55)]
    #[case(100)]
    fn given_progress_in_range_when_creating_then_accepts(#[case] value: i64) {
        assert_eq!(i64::from(Progress::new(value).unwrap().value()), value);
    }

    #[rstest]
    #[case(-1)]
    #[case(101)]
    #[case(i64::MAX)]
    fn given_progress_out_of_range_when_creating_then_rejects(#[case] value: i64) {
        assert_eq!(
            Progress::new(value),
            Err(DomainError::ProgressOutOfRange(value))
        );
    }

    #[test]
    fn given_out_of_range_progress_when_clamping_then_saturates() {
        assert_eq!(Progress::clamped(-20).value(), 0);
        assert_eq!(Progress::clamped(250).value(), 100);
        assert_eq!(Progress::clamped(42).value(), 42);
    }

    #[test]
    fn given_blank_title_when_creating_then_rejects() {
        assert_eq!(Title::new(""), Err(DomainError::EmptyTitle));
        assert_eq!(Title::new("   "), Err(DomainError::EmptyTitle));
        assert_eq!(Title::new(" Ops ").unwrap().as_str(), " Ops ");
    }

    #[test]
    fn given_coordinates_when_parsing_position_then_reads_both() {
        assert_eq!("10,-5.5".parse::<Position>().unwrap(), Position::new(10.0, -5.5));
        assert_eq!(" 1 , 2 ".parse::<Position>().unwrap(), Position::new(1.0, 2.0));
        assert!("10".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
        assert!("inf,0".parse::<Position>().is_err());
    }

    #[test]
    fn given_comma_list_when_parsing_people_then_trims_and_drops_blanks() {
        assert_eq!(
            parse_people("Ana, Bruno,, Carla ,"),
            vec!["Ana".to_string(), "Bruno".to_string(), "Carla".to_string()]
        );
        assert!(parse_people("  ").is_empty());
    }

    #[test]
    fn given_invalid_progress_when_applying_edit_then_node_unchanged() {
        let mut data = NodeData::builder("Task").build().unwrap();
        let before = data.clone();

        let result = data.apply(NodeEdit {
            title: Some("Renamed".into()),
            progress: Some(140),
            ..NodeEdit::default()
        });

        assert_eq!(result, Err(DomainError::ProgressOutOfRange(140)));
        assert_eq!(data, before);
    }

    #[test]
    fn given_full_edit_when_applying_then_updates_every_field() {
        let mut data = NodeData::builder("Task").build().unwrap();

        data.apply(NodeEdit {
            title: Some("Hiring".into()),
            text: Some("  open two roles \n".into()),
            people: Some(vec!["Ana".into()]),
            progress: Some(30),
            priority: Some(Priority::Urgent),
        })
        .unwrap();

        assert_eq!(data.title.as_str(), "Hiring");
        assert_eq!(data.text, "open two roles");
        assert_eq!(data.people, vec!["Ana".to_string()]);
        assert_eq!(data.progress.value(), 30);
        assert_eq!(data.priority, Priority::Urgent);
    }

    #[test]
    fn given_builder_with_bad_progress_when_building_then_rejects() {
        let result = NodeData::builder("Task").progress(-3).build();
        assert_eq!(result, Err(DomainError::ProgressOutOfRange(-3)));
    }
}
