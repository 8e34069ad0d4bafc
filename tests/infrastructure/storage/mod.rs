mod json_file_store_test;
