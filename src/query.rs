//! Filter, sort and pagination composition for client listings.
//!
//! [`page`] takes every record matching a filter and turns it into one
//! ordered page. Sorting by `birthdate` orders by the number of days until each
//! client's next birthday instead of by the raw date.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::birthday::days_until_next_birthday;
use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::pagination::PageResult;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Errors raised while building or evaluating a [`QueryRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("page must be at least 1")]
    InvalidPage,

    #[error("limit must be greater than zero")]
    InvalidLimit,

    #[error("unknown filter field: {0}")]
    UnknownFilterField(String),

    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("birthdate {birthdate} of client {client_id} has no next occurrence after {today}")]
    BirthdateOutOfRange {
        client_id: ClientId,
        birthdate: NaiveDate,
        today: NaiveDate,
    },
}

/// Columns that support case-insensitive substring filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientFilterField {
    Name,
    LastName,
    Email,
    Identification,
    Contact,
    Comment,
}

impl ClientFilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Identification => "identification",
            Self::Contact => "contact",
            Self::Comment => "comment",
        }
    }

    fn value_of(self, client: &Client) -> Option<&str> {
        match self {
            Self::Name => Some(client.name.as_str()),
            Self::LastName => client.last_name.as_ref().map(|n| n.as_str()),
            Self::Email => Some(client.email.as_str()),
            Self::Identification => Some(client.identification.as_str()),
            Self::Contact => Some(client.contact.as_str()),
            Self::Comment => Some(client.comment.as_str()),
        }
    }
}

impl FromStr for ClientFilterField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "last_name" | "lastName" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "identification" => Ok(Self::Identification),
            "contact" => Ok(Self::Contact),
            "comment" => Ok(Self::Comment),
            other => Err(QueryError::UnknownFilterField(other.to_string())),
        }
    }
}

impl Display for ClientFilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring match on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFilter {
    pub field: ClientFilterField,
    pub value: String,
}

impl ClientFilter {
    /// Returns `None` when `value` is blank; a blank filter matches everything.
    pub fn new(field: ClientFilterField, value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self { field, value })
        }
    }

    /// Evaluates the filter against an in-memory record.
    pub fn matches(&self, client: &Client) -> bool {
        let needle = self.value.to_lowercase();
        self.field
            .value_of(client)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    }
}

/// Columns a listing can be ordered by.
///
/// `Birthdate` is the "upcoming birthday" pseudo-column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientSortField {
    Id,
    Name,
    LastName,
    Email,
    Identification,
    Contact,
    Comment,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Birthdate,
}

impl ClientSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Identification => "identification",
            Self::Contact => "contact",
            Self::Comment => "comment",
            Self::IsActive => "is_active",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Birthdate => "birthdate",
        }
    }

    /// Plain column comparison; `None` family names sort first.
    fn compare(self, a: &Client, b: &Client) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::LastName => a.last_name.cmp(&b.last_name),
            Self::Email => a.email.cmp(&b.email),
            Self::Identification => a.identification.cmp(&b.identification),
            Self::Contact => a.contact.cmp(&b.contact),
            Self::Comment => a.comment.cmp(&b.comment),
            Self::IsActive => a.is_active.cmp(&b.is_active),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::Birthdate => a.birthdate.cmp(&b.birthdate),
        }
    }
}

impl FromStr for ClientSortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "last_name" | "lastName" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "identification" => Ok(Self::Identification),
            "contact" => Ok(Self::Contact),
            "comment" => Ok(Self::Comment),
            "is_active" | "isActive" => Ok(Self::IsActive),
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "birthdate" | "birth_date" => Ok(Self::Birthdate),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

impl Display for ClientSortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Orients an ascending comparison. Equal stays equal, so stable sorts
    /// keep input order for ties in both directions.
    fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Filter, sort and pagination parameters of a client listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub filter: Option<ClientFilter>,
    pub sort: Option<ClientSortField>,
    pub direction: SortDirection,
    page: usize,
    limit: usize,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            direction: SortDirection::Ascending,
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Option<ClientFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort_by(mut self, field: ClientSortField, direction: SortDirection) -> Self {
        self.sort = Some(field);
        self.direction = direction;
        self
    }

    /// Sets the 1-based page and the page size.
    pub fn paginate(mut self, page: usize, limit: usize) -> Result<Self, QueryError> {
        if page < 1 {
            return Err(QueryError::InvalidPage);
        }
        if limit == 0 {
            return Err(QueryError::InvalidLimit);
        }
        self.page = page;
        self.limit = limit;
        Ok(self)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Orders `records` in place according to `field` and `direction`.
///
/// Sorting is stable: records with equal keys keep their relative order.
pub fn sort_clients(
    records: &mut Vec<Client>,
    field: ClientSortField,
    direction: SortDirection,
    today: NaiveDate,
) -> Result<(), QueryError> {
    if field != ClientSortField::Birthdate {
        records.sort_by(|a, b| direction.orient(field.compare(a, b)));
        return Ok(());
    }

    let mut keyed = std::mem::take(records)
        .into_iter()
        .map(|client| match days_until_next_birthday(client.birthdate, today) {
            Some(days) => Ok((days, client)),
            None => Err(QueryError::BirthdateOutOfRange {
                client_id: client.id,
                birthdate: client.birthdate,
                today,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| direction.orient(a.cmp(b)));
    records.extend(keyed.into_iter().map(|(_, client)| client));
    Ok(())
}

/// Builds one page out of every record matching the request's filter.
///
/// `records` must be in store order and `total` is the store's match count;
/// it is reported unchanged. Pages past the end are empty rather than errors.
pub fn page(
    mut records: Vec<Client>,
    total: usize,
    request: &QueryRequest,
    today: NaiveDate,
) -> Result<PageResult<Client>, QueryError> {
    if let Some(field) = request.sort {
        sort_clients(&mut records, field, request.direction, today)?;
    }

    let data = records
        .into_iter()
        .skip(request.offset())
        .take(request.limit())
        .collect();

    Ok(PageResult::new(data, request.page(), total))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::types::{ClientEmail, ClientName, Comment, Contact, Identification};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timestamp(seconds: i64) -> NaiveDateTime {
        chrono::DateTime::from_timestamp(seconds, 0)
            .unwrap()
            .naive_utc()
    }

    fn client(id: i32, name: &str, birthdate: NaiveDate) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            name: ClientName::new(name).unwrap(),
            last_name: None,
            email: ClientEmail::new(format!("client{id}@example.com")).unwrap(),
            identification: Identification::new(format!("ID-{id:04}")).unwrap(),
            birthdate,
            contact: Contact::new(format!("555-{id:04}")).unwrap(),
            comment: Comment::default(),
            is_active: true,
            created_at: timestamp(i64::from(id)),
            updated_at: timestamp(i64::from(id)),
        }
    }

    fn ids(page: &PageResult<Client>) -> Vec<i32> {
        page.data.iter().map(|c| c.id.get()).collect()
    }

    fn sample(count: i32) -> Vec<Client> {
        (1..=count)
            .map(|id| client(id, &format!("Client {id:02}"), date(1990, 1, 1)))
            .collect()
    }

    #[test]
    fn every_page_is_bounded_and_reports_full_total() {
        let today = date(2024, 6, 10);
        let records = sample(23);

        for limit in [1, 5, 10, 23, 50] {
            for page_number in 1..=5 {
                let request = QueryRequest::new().paginate(page_number, limit).unwrap();
                let result = page(records.clone(), 23, &request, today).unwrap();

                assert!(result.data.len() <= limit);
                assert_eq!(result.pagination.total, 23);
                assert_eq!(result.pagination.page, page_number);

                let expected: Vec<i32> = (1..=23)
                    .skip((page_number - 1) * limit)
                    .take(limit)
                    .collect();
                assert_eq!(ids(&result), expected);
            }
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let request = QueryRequest::new().paginate(4, 10).unwrap();
        let result = page(sample(23), 23, &request, date(2024, 6, 10)).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.pagination.total, 23);
        assert_eq!(result.pagination.page, 4);
    }

    #[test]
    fn total_is_reported_as_given() {
        // The store counted more matches than it handed over.
        let result = page(sample(3), 120, &QueryRequest::new(), date(2024, 6, 10)).unwrap();
        assert_eq!(result.pagination.total, 120);
        assert_eq!(result.data.len(), 3);
    }

    #[test]
    fn defaults_are_first_page_of_fifty() {
        let request = QueryRequest::new();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 50);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.direction, SortDirection::Ascending);
        assert_eq!(QueryRequest::new().paginate(3, 20).unwrap().offset(), 40);
    }

    #[test]
    fn invalid_pagination_is_rejected() {
        assert_eq!(
            QueryRequest::new().paginate(0, 10),
            Err(QueryError::InvalidPage)
        );
        assert_eq!(
            QueryRequest::new().paginate(1, 0),
            Err(QueryError::InvalidLimit)
        );
    }

    #[test]
    fn plain_field_ordering_follows_direction() {
        let today = date(2024, 6, 10);
        let records = vec![
            client(1, "Carla", date(1990, 1, 1)),
            client(2, "Ana", date(1990, 1, 1)),
            client(3, "Bruno", date(1990, 1, 1)),
        ];

        let asc = QueryRequest::new().sort_by(ClientSortField::Name, SortDirection::Ascending);
        let result = page(records.clone(), 3, &asc, today).unwrap();
        let names: Vec<&str> = result.data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bruno", "Carla"]);

        let desc = QueryRequest::new().sort_by(ClientSortField::Name, SortDirection::Descending);
        let result = page(records, 3, &desc, today).unwrap();
        let names: Vec<&str> = result.data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Carla", "Bruno", "Ana"]);
    }

    #[test]
    fn missing_last_name_sorts_first() {
        let mut with_last = client(1, "Ana", date(1990, 1, 1));
        with_last.last_name = Some(ClientName::new("Zapata").unwrap());
        let without_last = client(2, "Bea", date(1990, 1, 1));

        let request =
            QueryRequest::new().sort_by(ClientSortField::LastName, SortDirection::Ascending);
        let result = page(vec![with_last, without_last], 2, &request, date(2024, 6, 10)).unwrap();
        assert_eq!(ids(&result), [2, 1]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let today = date(2024, 6, 10);
        let records = vec![
            client(1, "Same", date(1990, 3, 3)),
            client(2, "Other", date(1990, 3, 3)),
            client(3, "Same", date(1980, 3, 3)),
            client(4, "Same", date(1970, 3, 3)),
        ];

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let by_name = QueryRequest::new().sort_by(ClientSortField::Name, direction);
            let result = page(records.clone(), 4, &by_name, today).unwrap();
            let same: Vec<i32> = ids(&result).into_iter().filter(|id| *id != 2).collect();
            assert_eq!(same, [1, 3, 4]);

            // All four share March 3rd.
            let by_birthday = QueryRequest::new().sort_by(ClientSortField::Birthdate, direction);
            let result = page(records.clone(), 4, &by_birthday, today).unwrap();
            assert_eq!(ids(&result), [1, 2, 3, 4]);
        }
    }

    #[test]
    fn birthday_today_sorts_first() {
        let today = date(2024, 6, 10);
        let records = vec![
            client(1, "Tomorrow", date(1990, 6, 11)),
            client(2, "Yesterday", date(1990, 6, 9)),
            client(3, "Today", date(2000, 6, 10)),
        ];
        let request =
            QueryRequest::new().sort_by(ClientSortField::Birthdate, SortDirection::Ascending);
        let result = page(records, 3, &request, today).unwrap();
        assert_eq!(ids(&result), [3, 1, 2]);
    }

    #[test]
    fn upcoming_birthday_scenario() {
        let today = date(2024, 6, 10);
        let a = client(1, "A", date(1991, 6, 15));
        let b = client(2, "B", date(1985, 6, 5));
        let c = client(3, "C", date(1979, 12, 25));

        assert_eq!(days_until_next_birthday(a.birthdate, today), Some(5));
        assert_eq!(days_until_next_birthday(c.birthdate, today), Some(198));
        assert_eq!(days_until_next_birthday(b.birthdate, today), Some(360));

        let asc = QueryRequest::new().sort_by(ClientSortField::Birthdate, SortDirection::Ascending);
        let result = page(vec![b.clone(), c.clone(), a.clone()], 3, &asc, today).unwrap();
        assert_eq!(ids(&result), [1, 3, 2]);

        let desc =
            QueryRequest::new().sort_by(ClientSortField::Birthdate, SortDirection::Descending);
        let result = page(vec![a, b, c], 3, &desc, today).unwrap();
        assert_eq!(ids(&result), [2, 3, 1]);
    }

    #[test]
    fn birthday_ordering_differs_from_raw_date_ordering() {
        let today = date(2024, 6, 10);
        let older = client(1, "Older", date(1950, 1, 1));
        let younger = client(2, "Younger", date(2000, 6, 20));

        let by_birthday =
            QueryRequest::new().sort_by(ClientSortField::Birthdate, SortDirection::Ascending);
        let result = page(vec![older, younger], 2, &by_birthday, today).unwrap();
        assert_eq!(ids(&result), [2, 1]);
    }

    #[test]
    fn birthday_sort_happens_before_slicing() {
        let today = date(2024, 6, 10);
        let records: Vec<Client> = (1..=6)
            .map(|id| client(id, "X", date(1990, 7, 7 - id as u32)))
            .collect();
        // Birthdays July 6 (id 1) down to July 1 (id 6): soonest is id 6.
        let request = QueryRequest::new()
            .sort_by(ClientSortField::Birthdate, SortDirection::Ascending)
            .paginate(2, 2)
            .unwrap();
        let result = page(records, 6, &request, today).unwrap();
        assert_eq!(ids(&result), [4, 3]);
    }

    #[test]
    fn unrepresentable_birthday_is_an_error() {
        let records = vec![client(9, "Far", date(1990, 1, 1))];
        let request =
            QueryRequest::new().sort_by(ClientSortField::Birthdate, SortDirection::Ascending);
        let err = page(records, 1, &request, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, QueryError::BirthdateOutOfRange { .. }));
    }

    #[test]
    fn field_names_parse_in_both_spellings() {
        assert_eq!("lastName".parse::<ClientSortField>(), Ok(ClientSortField::LastName));
        assert_eq!("last_name".parse::<ClientSortField>(), Ok(ClientSortField::LastName));
        assert_eq!("birthdate".parse::<ClientSortField>(), Ok(ClientSortField::Birthdate));
        assert_eq!(
            "age".parse::<ClientSortField>(),
            Err(QueryError::UnknownSortField("age".to_string()))
        );
        assert_eq!("email".parse::<ClientFilterField>(), Ok(ClientFilterField::Email));
        assert!("birthdate".parse::<ClientFilterField>().is_err());
    }

    #[test]
    fn filter_matches_case_insensitive_substrings() {
        let mut record = client(1, "José", date(1990, 1, 1));
        record.last_name = Some(ClientName::new("García-López").unwrap());

        let filter = ClientFilter::new(ClientFilterField::LastName, "garcía").unwrap();
        assert!(filter.matches(&record));
        let filter = ClientFilter::new(ClientFilterField::Name, "OS").unwrap();
        assert!(filter.matches(&record));
        let filter = ClientFilter::new(ClientFilterField::Email, "nobody").unwrap();
        assert!(!filter.matches(&record));

        assert!(ClientFilter::new(ClientFilterField::Name, "   ").is_none());
    }
}
