mod reservation_tests;
