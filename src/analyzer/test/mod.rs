mod analyze_test;
