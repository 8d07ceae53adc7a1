// Integration tests module

mod integration {
    mod fixture;

    mod battery_test;
    mod network_test;
    mod notifications_test;
    mod status_line_test;
}
