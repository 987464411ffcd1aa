//! Integration test suite for the Plexo kernel and the demo plugin family.

mod helpers;

mod compose_test;
mod messaging_test;
mod pipeline_test;
mod routing_test;
mod values_test;
