mod test_utils;

mod booking_test;
mod mentor_test;
mod middleware_test;
mod slot_test;
