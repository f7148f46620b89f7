//! Topic addresses and subscription patterns.
//!
//! A topic lives at `<root>://<tenant>/<namespace>/<name>`. Subscriptions
//! select topics by a regular expression over the name within one tenant and
//! namespace.

use std::fmt;

use regex::Regex;

use crate::config::StreamConfig;
use crate::errors::TopicError;

/// Fully qualified address of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicAddress {
    pub root: String,
    pub tenant: String,
    pub namespace: String,
    pub name: String,
}

impl TopicAddress {
    pub fn new(config: &StreamConfig, name: impl Into<String>) -> Self {
        Self {
            root: config.root.clone(),
            tenant: config.tenant.clone(),
            namespace: config.namespace.clone(),
            name: name.into(),
        }
    }

    /// Name of the Kafka topic backing this address: `<tenant>.<namespace>.<name>`.
    pub fn kafka_topic(&self) -> String {
        format!("{}.{}.{}", self.tenant, self.namespace, self.name)
    }
}

impl fmt::Display for TopicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}",
            self.root, self.tenant, self.namespace, self.name
        )
    }
}

/// A set of topics within one tenant and namespace, selected by name.
#[derive(Debug, Clone)]
pub struct TopicPattern {
    root: String,
    tenant: String,
    namespace: String,
    name_pattern: String,
    name_regex: Regex,
}

impl TopicPattern {
    /// Builds a pattern matching every topic whose whole name matches
    /// `name_pattern`.
    pub fn new(config: &StreamConfig, name_pattern: impl Into<String>) -> Result<Self, TopicError> {
        let name_pattern = name_pattern.into();
        let name_regex = Regex::new(&format!("^(?:{})$", name_pattern)).map_err(|e| {
            TopicError::InvalidFilter {
                filter: name_pattern.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            root: config.root.clone(),
            tenant: config.tenant.clone(),
            namespace: config.namespace.clone(),
            name_pattern,
            name_regex,
        })
    }

    /// Whether a bare topic name matches.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name_regex.is_match(name)
    }

    pub fn matches(&self, topic: &TopicAddress) -> bool {
        topic.root == self.root
            && topic.tenant == self.tenant
            && topic.namespace == self.namespace
            && self.matches_name(&topic.name)
    }

    /// Regex subscription in librdkafka's form; a leading `^` marks it as a
    /// pattern rather than a literal topic name.
    pub fn kafka_regex(&self) -> String {
        format!(
            "^{}\\.{}\\.(?:{})$",
            regex::escape(&self.tenant),
            regex::escape(&self.namespace),
            self.name_pattern
        )
    }

    /// Recovers the topic address from a Kafka topic name.
    pub fn address_from_kafka_topic(&self, kafka_topic: &str) -> Option<TopicAddress> {
        let prefix = format!("{}.{}.", self.tenant, self.namespace);
        let name = kafka_topic.strip_prefix(&prefix)?;
        Some(TopicAddress {
            root: self.root.clone(),
            tenant: self.tenant.clone(),
            namespace: self.namespace.clone(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}",
            self.root, self.tenant, self.namespace, self.name_pattern
        )
    }
}
